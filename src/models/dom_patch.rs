//! 页面修改指令
//!
//! 渲染逻辑只产出 `DomPatch`，由 `PageSurface` 负责真正落到页面上

use serde::{Deserialize, Serialize};

/// 提示框类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

impl NoticeKind {
    /// 提示框背景色
    pub fn color(self) -> &'static str {
        match self {
            NoticeKind::Info => "#2c3e50",
            NoticeKind::Success => "#27ae60",
            NoticeKind::Error => "#c0392b",
        }
    }
}

/// 替换正文时插入的内容块
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// 每个非空行一段
    pub paragraphs: Vec<String>,
    /// 固定署名行
    pub signature: String,
}

impl ContentBlock {
    pub fn from_text(text: &str, signature: impl Into<String>) -> Self {
        Self {
            paragraphs: text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            signature: signature.into(),
        }
    }
}

/// 一次页面修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DomPatch {
    /// 改写标题元素的文本和样式
    ///
    /// `expected_text` 是规划时目标元素文本的开头，实时页面与快照不一致时用来重新定位
    StyleHeading {
        selector: String,
        index: usize,
        expected_text: String,
        text: String,
        style: String,
    },
    /// 只改写文档标题（页面上没有标题元素时）
    SetDocumentTitle { text: String },
    /// 清空容器并放入新内容
    ReplaceContainer {
        selector: String,
        index: usize,
        expected_text: String,
        block: ContentBlock,
    },
    /// 在页面末尾追加内容
    AppendBlock { block: ContentBlock },
    /// 显示提示框（替换已有提示框）
    ShowNotice {
        id: u64,
        message: String,
        kind: NoticeKind,
    },
    /// 移除指定提示框；`id` 为空时移除任意提示框
    DismissNotice { id: Option<u64> },
}

impl DomPatch {
    /// 该修改是否依赖页面上已有的元素
    pub fn target_selector(&self) -> Option<&str> {
        match self {
            DomPatch::StyleHeading { selector, .. } | DomPatch::ReplaceContainer { selector, .. } => {
                Some(selector.as_str())
            }
            _ => None,
        }
    }
}
