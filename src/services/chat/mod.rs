//! 大模型补全服务
//!
//! `CompletionClient` 抽象上游补全接口，默认实现对接 Groq

pub mod groq;

use async_trait::async_trait;

use crate::error::UpstreamError;
use crate::models::CompletionRequest;

pub use groq::GroqClient;

/// 补全客户端
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 发送 system + user 消息，返回第一条候选回复的文本
    async fn complete(&self, request: &CompletionRequest) -> Result<String, UpstreamError>;
}
