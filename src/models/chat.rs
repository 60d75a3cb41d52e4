//! 聊天数据模型
//!
//! 包含对外的请求/响应以及补全接口（OpenAI 兼容）的报文结构

use serde::{Deserialize, Serialize};

/// 聊天请求
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// 用户消息，缺省按空串处理
    #[serde(default)]
    pub message: String,
}

/// 聊天响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// 模型回复原文
    pub response: String,
}

/// 一次补全调用的参数
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// 对话消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// `/chat/completions` 请求体
#[derive(Debug, Serialize)]
pub struct CompletionBody<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl<'a> From<&'a CompletionRequest> for CompletionBody<'a> {
    fn from(req: &'a CompletionRequest) -> Self {
        Self {
            model: &req.model,
            messages: vec![ChatMessage::system(&req.system), ChatMessage::user(&req.user)],
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        }
    }
}

/// `/chat/completions` 响应体，只保留需要的字段
#[derive(Debug, Deserialize)]
pub struct CompletionReply {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
pub struct ReplyMessage {
    pub content: Option<String>,
}
