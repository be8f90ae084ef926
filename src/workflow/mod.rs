pub mod article_flow;
pub mod page_state;

pub use article_flow::{ArticleFlow, RunOutcome};
pub use page_state::PageTransformState;
