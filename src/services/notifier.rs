//! 提示框服务 - 业务能力层
//!
//! 在页面上显示可关闭的短暂提示，新提示替换旧提示

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::infrastructure::PageSurface;
use crate::models::{DomPatch, NoticeKind};

/// 提示框服务
pub struct Notifier<P: PageSurface + 'static> {
    surface: Arc<P>,
    duration: Duration,
    next_id: AtomicU64,
    pending_dismiss: Mutex<Option<JoinHandle<()>>>,
}

impl<P: PageSurface + 'static> Notifier<P> {
    pub fn new(surface: Arc<P>, duration: Duration) -> Self {
        Self {
            surface,
            duration,
            next_id: AtomicU64::new(1),
            pending_dismiss: Mutex::new(None),
        }
    }

    /// 显示提示框，到时自动关闭
    ///
    /// 返回提示框 id
    pub async fn notify(&self, message: &str, kind: NoticeKind) -> Result<u64> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.cancel_pending();

        debug!("显示提示框 #{} ({:?}): {}", id, kind, message);
        self.surface
            .apply(&DomPatch::ShowNotice {
                id,
                message: message.to_string(),
                kind,
            })
            .await?;

        let surface = Arc::clone(&self.surface);
        let duration = self.duration;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if let Err(e) = surface.apply(&DomPatch::DismissNotice { id: Some(id) }).await {
                warn!("自动关闭提示框 #{} 失败: {}", id, e);
            }
        });
        if let Ok(mut pending) = self.pending_dismiss.lock() {
            *pending = Some(handle);
        }

        Ok(id)
    }

    /// 立即关闭当前提示框
    pub async fn dismiss(&self) -> Result<()> {
        self.cancel_pending();
        self.surface
            .apply(&DomPatch::DismissNotice { id: None })
            .await
    }

    /// 等待当前提示框自动关闭
    pub async fn wait_dismissed(&self) {
        let handle = self
            .pending_dismiss
            .lock()
            .ok()
            .and_then(|mut pending| pending.take());
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn cancel_pending(&self) {
        if let Ok(mut pending) = self.pending_dismiss.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
        }
    }
}
