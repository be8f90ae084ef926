//! 选择器编译

use scraper::{ElementRef, Selector};

use crate::error::{AppError, AppResult};

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// 编译后的选择器，保留原始文本用于生成页面脚本
#[derive(Debug, Clone)]
pub struct CompiledSelector {
    pub source: String,
    pub selector: Selector,
}

impl CompiledSelector {
    pub fn parse(source: &str) -> AppResult<Self> {
        let selector = Selector::parse(source)
            .map_err(|e| AppError::invalid_selector(source, e.to_string()))?;
        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }
}

/// 按顺序编译整张表
pub fn compile_all(sources: &[String]) -> AppResult<Vec<CompiledSelector>> {
    sources.iter().map(|s| CompiledSelector::parse(s)).collect()
}

/// 是否为 h1-h6
pub fn is_heading(element: &ElementRef) -> bool {
    HEADING_TAGS.contains(&element.value().name())
}

/// 元素的文本，连续空白折叠为一个空格
pub fn element_text(element: &ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
