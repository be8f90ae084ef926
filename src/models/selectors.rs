//! 选择器表
//!
//! 抽取和渲染都按表中的顺序逐条尝试，表本身可以由 TOML 文件覆盖

use serde::{Deserialize, Serialize};

/// 选择器与阈值配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// 标题选择器（只接受 h1-h6）
    pub title_selectors: Vec<String>,
    /// 标题 meta 标签，读取 content 属性
    pub title_meta_selectors: Vec<String>,
    /// 抽取正文时的容器选择器
    pub body_containers: Vec<String>,
    /// 渲染正文时的容器选择器
    pub render_containers: Vec<String>,
    /// 段落选择器
    pub paragraph_selector: String,
    /// 容器内段落的最小字符数
    pub container_min_chars: usize,
    /// 全文扫描时段落的最小字符数
    pub document_min_chars: usize,
    /// 全文扫描时段落的最小词数
    pub document_min_words: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            title_selectors: strings(&[
                "h1.article-title",
                "h1.headline",
                "h1.entry-title",
                "h1[itemprop='headline']",
                "article h1",
                ".article-header h1",
                "header h1",
                "h1",
                "article h2",
            ]),
            title_meta_selectors: strings(&[
                "meta[property='og:title']",
                "meta[name='twitter:title']",
            ]),
            body_containers: strings(&[
                "article",
                "[itemprop='articleBody']",
                ".article-body",
                ".article-content",
                ".story-body",
                ".post-content",
                ".entry-content",
                "main",
                "[role='main']",
            ]),
            render_containers: strings(&[
                "[itemprop='articleBody']",
                ".article-body",
                ".article-content",
                ".story-body",
                ".entry-content",
                ".post-content",
                "article",
                "#content",
                "main",
            ]),
            paragraph_selector: "p".to_string(),
            container_min_chars: 50,
            document_min_chars: 100,
            document_min_words: 10,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SelectorConfig = toml::from_str(
            r#"
            title_selectors = ["h1.story-title"]
            container_min_chars = 80
            "#,
        )
        .unwrap();

        assert_eq!(config.title_selectors, vec!["h1.story-title"]);
        assert_eq!(config.container_min_chars, 80);
        assert_eq!(config.paragraph_selector, "p");
        assert_eq!(config.body_containers, SelectorConfig::default().body_containers);
    }

    #[test]
    fn test_render_order_differs_from_extraction() {
        let config = SelectorConfig::default();
        assert_ne!(config.body_containers, config.render_containers);
        assert!(config
            .render_containers
            .iter()
            .any(|s| config.body_containers.contains(s)));
    }
}
