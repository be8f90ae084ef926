//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责资源管理和消息调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行、退出）
//! - 管理浏览器资源（Browser、JsExecutor）
//! - 组装页面流程和后台服务
//!
//! ### `transform_worker` - 后台改编服务
//! - 持有 mpsc 接收端，每个请求单独处理
//! - 通过 oneshot 回复 TransformResponse
//! - 不接触页面
//!
//! ## 层次关系
//!
//! ```text
//! app (持有 Browser / JsExecutor)
//!     ↓
//! workflow::ArticleFlow (页面侧：抽取 → 请求 → 渲染)
//!     ↓ OrchestratorHandle
//! transform_worker (后台侧：GenerationService)
//!     ↓
//! services / clients (能力层：extractor / renderer / gemini)
//!     ↓
//! infrastructure (基础设施：JsExecutor / PageSurface)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有 Browser 和 JsExecutor
//! 2. **消息传递**：页面侧和后台侧只通过通道通信
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure

pub mod app;
pub mod transform_worker;

// 重新导出主要类型
pub use app::App;
pub use transform_worker::{OrchestratorHandle, TransformEnvelope, TransformWorker};
