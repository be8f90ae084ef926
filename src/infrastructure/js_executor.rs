//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"读取页面"和"执行 JS"的能力

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::BrowserError;
use crate::infrastructure::dom_script;
use crate::infrastructure::page_surface::PageSurface;
use crate::models::DomPatch;

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 不认识文章 / 改编请求
/// - 不处理业务流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 执行 JS 代码并返回 JSON 结果
    ///
    /// # 参数
    /// - `js_code`: 要执行的 JavaScript 代码
    ///
    /// # 返回
    /// 返回 JSON 值
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }
}

#[async_trait]
impl PageSurface for JsExecutor {
    async fn snapshot(&self) -> Result<String> {
        let html = self.page.content().await.context("无法读取页面内容")?;
        debug!("页面快照: {} 字节", html.len());
        Ok(html)
    }

    async fn locate(&self, patch: &DomPatch) -> Result<bool> {
        match dom_script::build_locate_script(patch).context("无法生成页面脚本")? {
            Some(script) => self.eval_as(script).await,
            None => Ok(true),
        }
    }

    async fn apply(&self, patch: &DomPatch) -> Result<()> {
        let script = dom_script::build_script(patch).context("无法生成页面脚本")?;
        let found: bool = self.eval_as(script).await?;

        if !found {
            if let Some(selector) = patch.target_selector() {
                return Err(BrowserError::ElementMissing {
                    selector: selector.to_string(),
                }
                .into());
            }
            // 提示框已被手动关闭或已被更新的提示框替换
            debug!("页面修改未命中目标: {:?}", patch);
        }

        Ok(())
    }
}
