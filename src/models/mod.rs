pub mod dom_patch;
pub mod gemini;
pub mod loaders;
pub mod message;
pub mod selectors;

pub use dom_patch::{ContentBlock, DomPatch, NoticeKind};
pub use loaders::{load_selector_config, load_selector_config_or_default};
pub use message::{
    ExtractionResult, OrchestratorMessage, TransformRequest, TransformResponse, UNKNOWN_ERROR,
};
pub use selectors::SelectorConfig;
