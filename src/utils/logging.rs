/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::{info, warn};

use crate::config::Config;
use crate::workflow::RunOutcome;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - 文章改编模式 ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🤖 模型: {}", config.model_name);
    if config.headless {
        info!("🌐 无头浏览器: {}", config.target_url.as_deref().unwrap_or("-"));
    } else {
        info!("🌐 浏览器调试端口: {}", config.browser_debug_port);
    }
    info!("{}", "=".repeat(60));
}

/// 记录抽取结果预览
///
/// # 参数
/// - `title`: 文章标题
/// - `body`: 文章正文
pub fn log_extraction_preview(title: &str, body: &str) {
    info!("📰 标题: {}", truncate_text(title, 80));
    info!(
        "📄 正文: {} 字符 | {}",
        body.chars().count(),
        truncate_text(body, 120)
    );
}

/// 打印最终结果
pub fn log_outcome(outcome: &RunOutcome) {
    info!("\n{}", "=".repeat(60));
    info!(
        "📊 处理完成 ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    match outcome {
        RunOutcome::Transformed => info!("✅ 页面已改编"),
        RunOutcome::AlreadyTransformed => info!("ℹ️ 页面此前已改编，跳过"),
        RunOutcome::ExtractionFailed => warn!("⚠️ 未能从页面抽取文章"),
        RunOutcome::Failed(message) => warn!("❌ 改编失败: {}", message),
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
