use crate::error::{AppResult, FileError};
use crate::models::selectors::SelectorConfig;
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载选择器表
///
/// 文件中缺失的字段使用默认值
pub async fn load_selector_config(toml_file_path: &Path) -> AppResult<SelectorConfig> {
    let path = toml_file_path.display().to_string();

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: path.clone(),
            source,
        })?;

    let config: SelectorConfig =
        toml::from_str(&content).map_err(|source| FileError::TomlParseFailed { path, source })?;

    tracing::info!(
        "已加载选择器表: {} 个标题选择器, {} 个正文容器",
        config.title_selectors.len(),
        config.body_containers.len()
    );

    Ok(config)
}

/// 有文件路径时加载，否则使用内置默认表
pub async fn load_selector_config_or_default(path: Option<&str>) -> AppResult<SelectorConfig> {
    match path {
        Some(path) => load_selector_config(Path::new(path)).await,
        None => Ok(SelectorConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "article_remix_{}_{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_selector_config() {
        let path = temp_file("ok", "render_containers = [\".story\"]\n");

        let config = load_selector_config(&path).await.unwrap();
        assert_eq!(config.render_containers, vec![".story"]);
        assert_eq!(config.title_selectors, SelectorConfig::default().title_selectors);

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_selector_config(Path::new("/definitely/not/here.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
    }

    #[tokio::test]
    async fn test_invalid_toml() {
        let path = temp_file("bad", "title_selectors = 42\n");

        let err = load_selector_config(&path).await.unwrap_err();
        assert!(matches!(err, AppError::File(FileError::TomlParseFailed { .. })));

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_default_without_path() {
        let config = load_selector_config_or_default(None).await.unwrap();
        assert_eq!(config, SelectorConfig::default());
    }
}
