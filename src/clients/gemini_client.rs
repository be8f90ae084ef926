/// Gemini API 客户端
///
/// 封装 generateContent 调用
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use tracing::{debug, warn};

/// Gemini 客户端
///
/// 只有请求发不出去或响应体读不出来时才返回错误；
/// 错误响应、格式不对、没有候选都视为"没有文本"
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    /// 根据配置创建客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_endpoint(&config.api_base_url, &config.model_name, &config.api_key)
    }

    /// 创建指向自定义地址的客户端
    pub fn with_endpoint(api_base_url: &str, model_name: &str, api_key: &str) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("article_remix/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::ClientBuildFailed { source })?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/models/{}:generateContent",
                api_base_url.trim_end_matches('/'),
                model_name
            ),
            api_key: api_key.to_string(),
        })
    }

    /// 请求地址（不含 API key）
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 生成文本
    ///
    /// # 返回
    /// - `Ok(Some(text))`: 第一个候选的文本（已去掉首尾空白）
    /// - `Ok(None)`: 响应中没有可用文本
    /// - `Err(_)`: 网络层失败
    pub async fn generate_text(
        &self,
        prompt: &str,
        generation_config: GenerationConfig,
    ) -> AppResult<Option<String>> {
        debug!(
            "调用 Gemini API: maxOutputTokens={}, temperature={}, 提示词 {} 字符",
            generation_config.max_output_tokens,
            generation_config.temperature,
            prompt.chars().count()
        );

        let request = GenerateContentRequest::user_prompt(prompt, generation_config);

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&self.endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(&self.endpoint, e))?;

        let parsed: GenerateContentResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Gemini 响应无法解析 (HTTP {}): {}", status, e);
                return Ok(None);
            }
        };

        if let Some(error) = &parsed.error {
            warn!(
                "Gemini 返回错误 (HTTP {}): code={:?}, status={:?}, message={:?}",
                status, error.code, error.status, error.message
            );
            return Ok(None);
        }

        if !status.is_success() {
            warn!("Gemini 返回非成功状态: HTTP {}", status);
            return Ok(None);
        }

        let text = parsed
            .first_text()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        if text.is_none() {
            warn!("Gemini 响应中没有候选文本");
        }

        Ok(text)
    }
}
