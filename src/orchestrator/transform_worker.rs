//! 后台改编服务 - 编排层
//!
//! ## 职责
//!
//! 相当于常驻后台的 worker：
//! - 通过 mpsc 通道接收页面发来的消息
//! - 每个请求在独立的任务中处理，互不影响
//! - 通过 oneshot 通道回复，回复前通道一直保持打开
//! - 处理过程中的 panic 也转换为失败响应

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::models::{OrchestratorMessage, TransformRequest, TransformResponse, UNKNOWN_ERROR};
use crate::services::GenerationService;

/// 通道容量
const CHANNEL_CAPACITY: usize = 16;

/// 一条待处理的消息及其回复通道
#[derive(Debug)]
pub struct TransformEnvelope {
    pub message: OrchestratorMessage,
    pub reply: oneshot::Sender<TransformResponse>,
}

/// 页面侧持有的句柄
#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
    tx: mpsc::Sender<TransformEnvelope>,
}

impl OrchestratorHandle {
    /// 创建句柄和对应的接收端
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<TransformEnvelope>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// 发送改编请求并等待回复
    ///
    /// 后台不可用或回复丢失时返回失败响应
    pub async fn transform(&self, request: TransformRequest) -> TransformResponse {
        let (reply, response) = oneshot::channel();
        let envelope = TransformEnvelope {
            message: OrchestratorMessage::TransformArticle(request),
            reply,
        };

        if self.tx.send(envelope).await.is_err() {
            error!("后台改编服务未运行");
            return TransformResponse::failed("后台改编服务未运行");
        }

        response.await.unwrap_or_else(|_| {
            error!("后台改编服务未返回结果");
            TransformResponse::failed(UNKNOWN_ERROR)
        })
    }
}

/// 后台改编 worker
pub struct TransformWorker;

impl TransformWorker {
    /// 启动后台 worker
    pub fn spawn(service: GenerationService) -> (OrchestratorHandle, JoinHandle<()>) {
        let (handle, rx) = OrchestratorHandle::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(Self::serve(rx, move |request| {
            let service = service.clone();
            async move { service.handle_transform_request(request).await }
        }));
        info!("✓ 后台改编服务已启动");
        (handle, task)
    }

    /// 处理消息直到所有句柄都被释放
    pub async fn serve<F, Fut>(mut rx: mpsc::Receiver<TransformEnvelope>, handler: F)
    where
        F: Fn(TransformRequest) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = TransformResponse> + Send + 'static,
    {
        while let Some(TransformEnvelope { message, reply }) = rx.recv().await {
            let handler = handler.clone();
            tokio::spawn(async move {
                let response = dispatch(message, handler).await;
                if reply.send(response).is_err() {
                    debug!("请求方已不再等待回复");
                }
            });
        }
        debug!("后台改编服务已退出");
    }
}

async fn dispatch<F, Fut>(message: OrchestratorMessage, handler: F) -> TransformResponse
where
    F: Fn(TransformRequest) -> Fut,
    Fut: Future<Output = TransformResponse>,
{
    match message {
        OrchestratorMessage::TransformArticle(request) => {
            match AssertUnwindSafe(handler(request)).catch_unwind().await {
                Ok(response) => response,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!("改编过程中发生意外错误: {}", message);
                    TransformResponse::failed(message)
                }
            }
        }
    }
}

/// panic 负载中的文本
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        UNKNOWN_ERROR.to_string()
    }
}
