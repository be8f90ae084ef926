//! 页面能力抽象
//!
//! 上层只需要"读取当前 DOM"和"执行一次修改"两种能力

use anyhow::Result;
use async_trait::async_trait;

use crate::models::DomPatch;

/// 页面表面
#[async_trait]
pub trait PageSurface: Send + Sync {
    /// 当前页面的 HTML
    async fn snapshot(&self) -> Result<String>;

    /// 修改的目标元素是否存在；不依赖已有元素的修改总是存在
    async fn locate(&self, patch: &DomPatch) -> Result<bool>;

    /// 执行一次页面修改
    async fn apply(&self, patch: &DomPatch) -> Result<()>;
}
