//! # Article Remix
//!
//! 把浏览器中打开的新闻文章改编成"电影原声"：生成电影标题和歌词并改写页面
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//! - `PageSurface` - 页面能力抽象（快照 + 修改）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个页面或单个请求
//! - `ArticleExtractor` - 标题 / 正文抽取能力
//! - `PageRenderer` - 页面改写规划能力
//! - `Notifier` - 页面提示框能力
//! - `GenerationService` - 电影标题 / 歌词生成能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个页面"的完整改编流程
//! - `PageTransformState` - 每次加载只改编一次
//! - `ArticleFlow` - 流程编排（extract → request → render → notify）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，管理浏览器资源
//! - `orchestrator/transform_worker` - 后台改编服务，通过通道收发消息
//!
//! ## 模块结构

pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::connect_to_browser_and_page;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{JsExecutor, PageSurface};
pub use models::{ExtractionResult, TransformRequest, TransformResponse};
pub use orchestrator::{App, OrchestratorHandle, TransformWorker};
pub use workflow::{ArticleFlow, PageTransformState, RunOutcome};
