//! 文章改编流程 - 流程层
//!
//! 核心职责：定义"一个页面"的完整改编流程
//!
//! 流程顺序：
//! 1. 检查页面是否已改编
//! 2. 抽取标题和正文（失败时直接提示，不联系后台）
//! 3. 发送改编请求并等待回复
//! 4. 成功：改写标题和正文；失败：提示错误，页面保持原样

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::error::BrowserError;
use crate::infrastructure::PageSurface;
use crate::models::NoticeKind;
use crate::orchestrator::OrchestratorHandle;
use crate::services::{ArticleExtractor, Notifier, PageRenderer};
use crate::utils::logging::log_extraction_preview;
use crate::workflow::page_state::PageTransformState;

const EXTRACTION_FAILED_NOTICE: &str = "Could not find an article on this page";
const IN_PROGRESS_NOTICE: &str = "Transforming article...";
const SUCCESS_NOTICE: &str = "Article transformed into a movie soundtrack!";

/// 单次运行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// 页面此前已改编
    AlreadyTransformed,
    /// 标题或正文缺失
    ExtractionFailed,
    /// 页面已改写
    Transformed,
    /// 改编失败（面向用户的错误文本）
    Failed(String),
}

/// 文章改编流程
///
/// - 编排完整的页面改编流程
/// - 只通过 `PageSurface` 接触页面
/// - 只通过 `OrchestratorHandle` 联系后台
pub struct ArticleFlow<P: PageSurface + 'static> {
    surface: Arc<P>,
    extractor: ArticleExtractor,
    renderer: PageRenderer,
    notifier: Notifier<P>,
    orchestrator: OrchestratorHandle,
    state: PageTransformState,
    verbose_logging: bool,
}

impl<P: PageSurface + 'static> ArticleFlow<P> {
    pub fn new(
        surface: Arc<P>,
        extractor: ArticleExtractor,
        renderer: PageRenderer,
        notifier: Notifier<P>,
        orchestrator: OrchestratorHandle,
        verbose_logging: bool,
    ) -> Self {
        Self {
            surface,
            extractor,
            renderer,
            notifier,
            orchestrator,
            state: PageTransformState::new(),
            verbose_logging,
        }
    }

    pub fn notifier(&self) -> &Notifier<P> {
        &self.notifier
    }

    pub fn state(&self) -> &PageTransformState {
        &self.state
    }

    pub async fn run(&mut self) -> Result<RunOutcome> {
        if self.state.is_transformed() {
            info!("ℹ️ 页面已改编，跳过");
            return Ok(RunOutcome::AlreadyTransformed);
        }

        // ========== 1. 抽取 ==========
        info!("🔍 正在抽取文章...");
        let html = self.surface.snapshot().await?;
        let extraction = self.extractor.extract(&html);

        if self.verbose_logging {
            if let (Some(title), Some(body)) = (&extraction.title, &extraction.body) {
                log_extraction_preview(title, body);
            }
        }

        let Some(request) = extraction.into_request() else {
            warn!("⚠️ 未找到标题或正文，不发送请求");
            self.notifier
                .notify(EXTRACTION_FAILED_NOTICE, NoticeKind::Error)
                .await?;
            return Ok(RunOutcome::ExtractionFailed);
        };
        info!(
            "✓ 抽取完成: 标题 {} 字符, 正文 {} 字符",
            request.article_title.chars().count(),
            request.article_body.chars().count()
        );

        // ========== 2. 请求后台 ==========
        self.notifier
            .notify(IN_PROGRESS_NOTICE, NoticeKind::Info)
            .await?;
        let response = self.orchestrator.transform(request).await;

        let Some((movie_title, song_lyrics)) = response.content() else {
            let message = response.error_text().to_string();
            return self.fail(message).await;
        };

        // ========== 3. 渲染 ==========
        if let Err(e) = self.render(movie_title, song_lyrics).await {
            error!("❌ 页面改写失败: {}", e);
            return self.fail(e.to_string()).await;
        }

        self.state.mark_transformed();
        info!("✅ 页面改写完成: {}", movie_title);
        self.notifier
            .notify(SUCCESS_NOTICE, NoticeKind::Success)
            .await?;
        Ok(RunOutcome::Transformed)
    }

    /// 基于最新的页面快照改写标题和正文
    ///
    /// 两个目标都确认存在后才开始修改；正文先于标题写入，
    /// 标题是下次抽取的依据，只在最后一步改动
    async fn render(&self, movie_title: &str, song_lyrics: &str) -> Result<()> {
        let html = self.surface.snapshot().await?;
        let body_patch = self.renderer.render_body(&html, song_lyrics);
        let title_patch = self.renderer.render_title(&html, movie_title);

        for patch in [&body_patch, &title_patch] {
            if !self.surface.locate(patch).await? {
                let selector = patch.target_selector().unwrap_or_default().to_string();
                return Err(BrowserError::ElementMissing { selector }.into());
            }
        }

        self.surface.apply(&body_patch).await?;
        self.surface.apply(&title_patch).await?;
        Ok(())
    }

    async fn fail(&self, message: String) -> Result<RunOutcome> {
        warn!("❌ 改编失败: {}", message);
        self.notifier
            .notify(&format!("Transformation failed: {}", message), NoticeKind::Error)
            .await?;
        Ok(RunOutcome::Failed(message))
    }
}
