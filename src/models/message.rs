//! 页面与后台之间的消息契约

use serde::{Deserialize, Serialize};

/// 默认错误文本
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// 页面抽取结果
///
/// 字段缺失表示该部分抽取失败
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl ExtractionResult {
    /// 标题和正文都存在时才可以发送
    pub fn is_complete(&self) -> bool {
        self.title.is_some() && self.body.is_some()
    }

    /// 转换为改编请求，任一字段缺失时返回 None
    pub fn into_request(self) -> Option<TransformRequest> {
        match (self.title, self.body) {
            (Some(article_title), Some(article_body)) => Some(TransformRequest {
                article_title,
                article_body,
            }),
            _ => None,
        }
    }
}

/// 发往后台的消息
///
/// 序列化形式：`{"action": "transformArticle", "articleTitle": ..., "articleBody": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum OrchestratorMessage {
    #[serde(rename = "transformArticle")]
    TransformArticle(TransformRequest),
}

/// 改编请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    pub article_title: String,
    pub article_body: String,
}

/// 改编响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_lyrics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransformResponse {
    pub fn succeeded(movie_title: impl Into<String>, song_lyrics: impl Into<String>) -> Self {
        Self {
            success: true,
            movie_title: Some(movie_title.into()),
            song_lyrics: Some(song_lyrics.into()),
            error: None,
        }
    }

    /// 失败响应；空消息替换为 "Unknown error"
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        };
        Self {
            success: false,
            movie_title: None,
            song_lyrics: None,
            error: Some(message),
        }
    }

    /// 成功且带有完整内容时返回 (标题, 歌词)
    pub fn content(&self) -> Option<(&str, &str)> {
        if !self.success {
            return None;
        }
        match (&self.movie_title, &self.song_lyrics) {
            (Some(title), Some(lyrics)) => Some((title.as_str(), lyrics.as_str())),
            _ => None,
        }
    }

    /// 面向用户的错误文本
    pub fn error_text(&self) -> &str {
        self.error
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(UNKNOWN_ERROR)
    }
}
