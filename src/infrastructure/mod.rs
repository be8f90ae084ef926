pub mod dom_script;
pub mod js_executor;
pub mod page_surface;

pub use js_executor::JsExecutor;
pub use page_surface::PageSurface;
