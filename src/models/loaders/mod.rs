pub mod toml_loader;

pub use toml_loader::{load_selector_config, load_selector_config_or_default};
