//! Groq 补全接口实现
//!
//! 对接 OpenAI 兼容的 `/chat/completions`，Bearer Token 认证

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::CompletionClient;
use crate::config::{ApiConfig, CompletionConfig};
use crate::error::UpstreamError;
use crate::models::{CompletionBody, CompletionReply, CompletionRequest};

/// Groq 补全客户端
pub struct GroqClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GroqClient {
    pub fn new(api: &ApiConfig, completion: &CompletionConfig, api_key: &str) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", completion.base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, UpstreamError> {
        log::debug!("📡 请求补全接口 URL: {}, 模型: {}", self.endpoint, request.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&CompletionBody::from(request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status(response.status()));
        }

        let reply: CompletionReply = response.json().await?;
        first_choice_text(reply)
    }
}

/// 取第一条候选回复
fn first_choice_text(reply: CompletionReply) -> Result<String, UpstreamError> {
    reply
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| UpstreamError::Malformed("补全响应中没有候选回复".to_string()))
}
