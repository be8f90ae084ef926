pub mod article_extractor;
pub mod generation_service;
pub mod notifier;
pub mod page_renderer;
pub mod selector_table;

pub use article_extractor::{ArticleExtractor, TitleSource};
pub use generation_service::{GenerationService, MOVIE_TITLE_PROFILE, SONG_LYRICS_PROFILE};
pub use notifier::Notifier;
pub use page_renderer::PageRenderer;
