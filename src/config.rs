use std::str::FromStr;

use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 浏览器配置 ---
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 文章页面 URL（找不到已打开的页面时导航到这里）
    pub target_url: Option<String>,
    /// 要附着的页面标题（包含匹配）
    pub target_title: Option<String>,
    /// 是否启动无头浏览器
    pub headless: bool,
    /// 无头模式下的浏览器可执行文件
    pub chrome_executable: Option<String>,
    // --- Gemini 配置 ---
    pub api_key: String,
    pub api_base_url: String,
    pub model_name: String,
    // --- 页面配置 ---
    /// 选择器表 TOML 文件
    pub selectors_file: Option<String>,
    /// 提示框自动消失时间（毫秒）
    pub notice_duration_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Config {
    pub const DEFAULT_API_BASE_URL: &'static str =
        "https://generativelanguage.googleapis.com/v1beta";
    pub const DEFAULT_MODEL_NAME: &'static str = "gemini-2.0-flash";
    pub const DEFAULT_DEBUG_PORT: u16 = 9222;
    pub const DEFAULT_NOTICE_DURATION_MS: u64 = 5000;

    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源加载配置
    ///
    /// `GEMINI_API_KEY` 必须提供；无头模式下 `TARGET_URL` 也必须提供
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::EnvVarNotFound {
                var_name: "GEMINI_API_KEY".to_string(),
            })?;

        let headless = parse_var(&lookup, "HEADLESS", false)?;
        let target_url = lookup("TARGET_URL").filter(|v| !v.is_empty());
        if headless && target_url.is_none() {
            return Err(ConfigError::EnvVarNotFound {
                var_name: "TARGET_URL".to_string(),
            });
        }

        Ok(Self {
            browser_debug_port: parse_var(&lookup, "BROWSER_DEBUG_PORT", Self::DEFAULT_DEBUG_PORT)?,
            target_url,
            target_title: lookup("TARGET_TITLE").filter(|v| !v.is_empty()),
            headless,
            chrome_executable: lookup("CHROME_EXECUTABLE").filter(|v| !v.is_empty()),
            api_key,
            api_base_url: lookup("GEMINI_API_BASE_URL")
                .unwrap_or_else(|| Self::DEFAULT_API_BASE_URL.to_string()),
            model_name: lookup("GEMINI_MODEL_NAME")
                .unwrap_or_else(|| Self::DEFAULT_MODEL_NAME.to_string()),
            selectors_file: lookup("SELECTORS_FILE").filter(|v| !v.is_empty()),
            notice_duration_ms: parse_var(
                &lookup,
                "NOTICE_DURATION_MS",
                Self::DEFAULT_NOTICE_DURATION_MS,
            )?,
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", false)?,
        })
    }
}

/// 解析可选的环境变量，不存在时使用默认值
fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k")])).unwrap();

        assert_eq!(config.api_key, "k");
        assert_eq!(config.browser_debug_port, 9222);
        assert_eq!(config.api_base_url, Config::DEFAULT_API_BASE_URL);
        assert_eq!(config.model_name, Config::DEFAULT_MODEL_NAME);
        assert_eq!(config.notice_duration_ms, 5000);
        assert!(!config.headless);
        assert!(!config.verbose_logging);
        assert!(config.target_url.is_none());
    }

    #[test]
    fn test_missing_api_key() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarNotFound { ref var_name } if var_name == "GEMINI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarNotFound { .. }));
    }

    #[test]
    fn test_malformed_port_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("BROWSER_DEBUG_PORT", "abc"),
        ]))
        .unwrap_err();

        match err {
            ConfigError::EnvVarParseFailed { var_name, value, .. } => {
                assert_eq!(var_name, "BROWSER_DEBUG_PORT");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_headless_requires_target_url() {
        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("HEADLESS", "true"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarNotFound { ref var_name } if var_name == "TARGET_URL"));

        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("HEADLESS", "true"),
            ("TARGET_URL", "https://news.example.com/a"),
        ]))
        .unwrap();
        assert!(config.headless);
        assert_eq!(config.target_url.as_deref(), Some("https://news.example.com/a"));
    }
}
