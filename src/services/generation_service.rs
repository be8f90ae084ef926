//! 文本生成服务 - 业务能力层
//!
//! 根据文章生成电影标题和歌词，只处理单个改编请求
//!
//! 失败策略：
//! - 网络层失败：整个改编失败
//! - 响应错误 / 格式不对 / 没有候选：使用默认文本，改编仍然成功

use std::sync::Arc;

use regex::Regex;
use tracing::{error, info, warn};

use crate::clients::GeminiClient;
use crate::error::{AppError, AppResult};
use crate::models::gemini::GenerationConfig;
use crate::models::{TransformRequest, TransformResponse};
use crate::utils::truncate_text;

/// 单次生成的参数
#[derive(Debug, Clone, Copy)]
pub struct GenerationProfile {
    /// 正文摘录的最大字符数
    pub excerpt_chars: usize,
    pub generation: GenerationConfig,
    /// 没有可用文本时的默认值
    pub fallback: &'static str,
}

pub const MOVIE_TITLE_PROFILE: GenerationProfile = GenerationProfile {
    excerpt_chars: 500,
    generation: GenerationConfig {
        temperature: 0.7,
        max_output_tokens: 50,
    },
    fallback: "The Untold Story",
};

pub const SONG_LYRICS_PROFILE: GenerationProfile = GenerationProfile {
    excerpt_chars: 1000,
    generation: GenerationConfig {
        temperature: 0.9,
        max_output_tokens: 500,
    },
    fallback: "No lyrics could be written for this story.",
};

/// 首尾成对的双引号或加粗标记，单引号和单个 `*` 属于标题本身
const TITLE_WRAPPER_PATTERN: &str = r#"^(?:\*\*(.+)\*\*|__(.+)__|"(.+)"|“(.+)”)$"#;

/// 文本生成服务
///
/// 职责：
/// - 构建提示词
/// - 两次独立、顺序的 API 调用
/// - 不持有任何页面资源
#[derive(Clone)]
pub struct GenerationService {
    client: Arc<GeminiClient>,
    title_wrapper: Regex,
}

impl GenerationService {
    pub fn new(client: GeminiClient) -> AppResult<Self> {
        let title_wrapper =
            Regex::new(TITLE_WRAPPER_PATTERN).map_err(|e| AppError::Other(e.to_string()))?;
        Ok(Self {
            client: Arc::new(client),
            title_wrapper,
        })
    }

    /// 处理一次改编请求
    ///
    /// 任何错误都转换为失败响应，不会向上抛出
    pub async fn handle_transform_request(&self, request: TransformRequest) -> TransformResponse {
        info!(
            "🎬 收到改编请求: {}",
            truncate_text(&request.article_title, 60)
        );

        match self.transform(&request).await {
            Ok((movie_title, song_lyrics)) => {
                info!("✓ 改编完成: {}", movie_title);
                TransformResponse::succeeded(movie_title, song_lyrics)
            }
            Err(e) => {
                error!("❌ 改编失败: {}", e);
                TransformResponse::failed(e.to_string())
            }
        }
    }

    async fn transform(&self, request: &TransformRequest) -> AppResult<(String, String)> {
        let movie_title = self
            .generate_movie_title(&request.article_title, &request.article_body)
            .await?;
        let song_lyrics = self
            .generate_song_lyrics(&request.article_title, &request.article_body)
            .await?;
        Ok((movie_title, song_lyrics))
    }

    /// 生成电影标题
    pub async fn generate_movie_title(&self, title: &str, body: &str) -> AppResult<String> {
        let prompt = build_movie_title_prompt(title, body);
        let text = self
            .client
            .generate_text(&prompt, MOVIE_TITLE_PROFILE.generation)
            .await?;

        Ok(match text {
            Some(text) => self.clean_movie_title(&text),
            None => {
                warn!("⚠️ 电影标题不可用，使用默认值");
                MOVIE_TITLE_PROFILE.fallback.to_string()
            }
        })
    }

    /// 生成歌词
    pub async fn generate_song_lyrics(&self, title: &str, body: &str) -> AppResult<String> {
        let prompt = build_song_lyrics_prompt(title, body);
        let text = self
            .client
            .generate_text(&prompt, SONG_LYRICS_PROFILE.generation)
            .await?;

        Ok(text.unwrap_or_else(|| {
            warn!("⚠️ 歌词不可用，使用默认值");
            SONG_LYRICS_PROFILE.fallback.to_string()
        }))
    }

    /// 取第一行非空文本，逐层去掉首尾成对的包裹
    fn clean_movie_title(&self, raw: &str) -> String {
        let mut title = raw
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default();

        while let Some(inner) = self
            .title_wrapper
            .captures(title)
            .and_then(|caps| caps.iter().skip(1).flatten().next())
            .map(|m| m.as_str().trim())
            .filter(|inner| !inner.is_empty())
        {
            title = inner;
        }

        title.to_string()
    }
}

/// 构建电影标题提示词
pub fn build_movie_title_prompt(title: &str, body: &str) -> String {
    format!(
        "Based on the following news article, create a creative and catchy movie title. \
         Respond with the movie title only, on a single line, without quotes or commentary.\n\n\
         Article title: {}\n\n\
         Article excerpt: {}",
        title,
        truncate_text(body, MOVIE_TITLE_PROFILE.excerpt_chars)
    )
}

/// 构建歌词提示词
pub fn build_song_lyrics_prompt(title: &str, body: &str) -> String {
    format!(
        "Based on the following news article, write the lyrics of a song for its movie soundtrack. \
         Use two or three verses and a repeating chorus, one lyric line per line, \
         and separate stanzas with a blank line. Respond with the lyrics only.\n\n\
         Article title: {}\n\n\
         Article excerpt: {}",
        title,
        truncate_text(body, SONG_LYRICS_PROFILE.excerpt_chars)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    const TITLE: &str = "Breaking News: Local Dog Wins National Dog Show";
    const BODY: &str = "A golden retriever named Buddy took home the top prize on Sunday.";

    fn service_for(base_url: &str) -> GenerationService {
        let client = GeminiClient::with_endpoint(base_url, "test-model", "key").unwrap();
        GenerationService::new(client).unwrap()
    }

    async fn mount_for_tokens(server: &MockServer, max_tokens: u32, body: serde_json::Value) {
        Mock::given(matchers::method("POST"))
            .and(matchers::body_partial_json(
                json!({"generationConfig": {"maxOutputTokens": max_tokens}}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn candidate(text: &str) -> serde_json::Value {
        json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
    }

    #[tokio::test]
    async fn test_malformed_title_response_uses_default() {
        let server = MockServer::start().await;
        mount_for_tokens(&server, 50, json!({"candidates": []})).await;
        mount_for_tokens(&server, 500, candidate("Woof woof\nHe is the best")).await;

        let response = service_for(&server.uri())
            .handle_transform_request(TransformRequest {
                article_title: TITLE.to_string(),
                article_body: BODY.to_string(),
            })
            .await;

        assert!(response.success);
        assert_eq!(response.movie_title.as_deref(), Some(MOVIE_TITLE_PROFILE.fallback));
        assert_eq!(response.song_lyrics.as_deref(), Some("Woof woof\nHe is the best"));
    }

    #[tokio::test]
    async fn test_api_error_for_lyrics_uses_default() {
        let server = MockServer::start().await;
        mount_for_tokens(&server, 50, candidate("Paws of Glory")).await;
        Mock::given(matchers::method("POST"))
            .and(matchers::body_partial_json(
                json!({"generationConfig": {"maxOutputTokens": 500}}),
            ))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"code": 429, "message": "quota", "status": "RESOURCE_EXHAUSTED"}
            })))
            .mount(&server)
            .await;

        let response = service_for(&server.uri())
            .handle_transform_request(TransformRequest {
                article_title: TITLE.to_string(),
                article_body: BODY.to_string(),
            })
            .await;

        assert_eq!(
            response,
            TransformResponse::succeeded("Paws of Glory", SONG_LYRICS_PROFILE.fallback)
        );
    }

    #[tokio::test]
    async fn test_network_failure_fails_whole_transform() {
        let uri = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };

        let response = service_for(&uri)
            .handle_transform_request(TransformRequest {
                article_title: TITLE.to_string(),
                article_body: BODY.to_string(),
            })
            .await;

        assert!(!response.success);
        assert!(response.movie_title.is_none());
        assert!(response.error.unwrap().contains("API请求失败"));
    }

    #[tokio::test]
    async fn test_calls_are_sequential_and_separate() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate("x")))
            .expect(2)
            .mount(&server)
            .await;

        let response = service_for(&server.uri())
            .handle_transform_request(TransformRequest {
                article_title: TITLE.to_string(),
                article_body: BODY.to_string(),
            })
            .await;
        assert!(response.success);

        let requests = server.received_requests().await.unwrap();
        let tokens: Vec<u64> = requests
            .iter()
            .map(|r| {
                let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
                body["generationConfig"]["maxOutputTokens"].as_u64().unwrap()
            })
            .collect();
        assert_eq!(tokens, vec![50, 500]);
    }

    #[test]
    fn test_clean_movie_title() {
        let service = service_for("http://localhost");

        assert_eq!(
            service.clean_movie_title("Buddy: The Golden Heart"),
            "Buddy: The Golden Heart"
        );
        assert_eq!(service.clean_movie_title("**\"Paws of Glory\"**"), "Paws of Glory");
        assert_eq!(service.clean_movie_title("\n“Best in Show”\nextra"), "Best in Show");
        assert_eq!(service.clean_movie_title("__Fetch__"), "Fetch");
    }

    #[test]
    fn test_clean_movie_title_keeps_title_characters() {
        let service = service_for("http://localhost");

        for title in [
            "'Til Death Do Us Bark",
            "The Boys'",
            "*batteries not included",
            "Movie Title: The Return",
            "\"Best\" in Show",
            "**",
        ] {
            assert_eq!(service.clean_movie_title(title), title);
        }
        assert_eq!(service.clean_movie_title("  'Til Dawn  "), "'Til Dawn");
    }

    #[test]
    fn test_prompts_truncate_excerpt() {
        let body = "a".repeat(1500);

        let title_prompt = build_movie_title_prompt(TITLE, &body);
        assert!(title_prompt.contains(TITLE));
        assert!(title_prompt.contains(&format!("{}...", "a".repeat(500))));
        assert!(!title_prompt.contains(&"a".repeat(501)));

        let lyrics_prompt = build_song_lyrics_prompt(TITLE, &body);
        assert!(lyrics_prompt.contains(&format!("{}...", "a".repeat(1000))));
        assert!(!lyrics_prompt.contains(&"a".repeat(1001)));
    }
}
