use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tracing::info;

use crate::browser;
use crate::clients::GeminiClient;
use crate::config::Config;
use crate::infrastructure::JsExecutor;
use crate::models::load_selector_config_or_default;
use crate::orchestrator::TransformWorker;
use crate::services::{ArticleExtractor, GenerationService, Notifier, PageRenderer};
use crate::utils::logging::{log_outcome, log_startup};
use crate::workflow::{ArticleFlow, RunOutcome};

/// 应用主结构
pub struct App {
    config: Config,
    _browser: Browser,
    executor: Arc<JsExecutor>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let (browser, page) = match (config.headless, config.target_url.as_deref()) {
            (true, Some(url)) => {
                browser::launch_headless_browser(url, config.chrome_executable.as_deref()).await?
            }
            _ => {
                browser::connect_to_browser_and_page(
                    config.browser_debug_port,
                    config.target_url.as_deref(),
                    config.target_title.as_deref(),
                )
                .await?
            }
        };

        Ok(Self {
            config,
            _browser: browser,
            executor: Arc::new(JsExecutor::new(page)),
        })
    }

    /// 运行一次页面改编
    pub async fn run(&self) -> Result<RunOutcome> {
        let selectors = load_selector_config_or_default(self.config.selectors_file.as_deref())
            .await
            .context("加载选择器表失败")?;

        // 后台服务
        let client = GeminiClient::new(&self.config)?;
        let service = GenerationService::new(client)?;
        let (handle, worker) = TransformWorker::spawn(service);

        // 页面流程
        let notifier = Notifier::new(
            Arc::clone(&self.executor),
            Duration::from_millis(self.config.notice_duration_ms),
        );
        let mut flow = ArticleFlow::new(
            Arc::clone(&self.executor),
            ArticleExtractor::new(&selectors)?,
            PageRenderer::new(&selectors)?,
            notifier,
            handle,
            self.config.verbose_logging,
        );

        let outcome = flow.run().await?;
        log_outcome(&outcome);

        // 等提示框消失后再退出
        info!("⏳ 等待提示框关闭...");
        flow.notifier().wait_dismissed().await;
        worker.abort();

        Ok(outcome)
    }
}
