//! 聊天服务
//!
//! 把用户消息和固定的系统提示词组合成补全请求

use std::sync::Arc;

use crate::config::CompletionConfig;
use crate::error::UpstreamError;
use crate::models::CompletionRequest;
use crate::services::chat::CompletionClient;

#[derive(Clone)]
pub struct ChatService {
    client: Arc<dyn CompletionClient>,
    system_prompt: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatService {
    pub fn new(client: Arc<dyn CompletionClient>, config: &CompletionConfig) -> Self {
        Self {
            client,
            system_prompt: config.system_prompt.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    fn build_request(&self, message: &str) -> CompletionRequest {
        CompletionRequest {
            system: self.system_prompt.clone(),
            user: message.to_string(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// 单轮问答，不保留上下文
    pub async fn ask(&self, message: &str) -> Result<String, UpstreamError> {
        let request = self.build_request(message);
        self.client.complete(&request).await
    }
}
