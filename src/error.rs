//! 错误类型
//!
//! `UpstreamError` 描述与上游服务（行情、大模型）交互时的失败，
//! `ApiError` 是处理器边界上的错误，负责映射 HTTP 状态码和 `{"error": ...}` 响应体。

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// 上游服务错误
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// 网络、超时等请求层面的失败
    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),

    /// 上游返回非成功状态码
    #[error("上游返回错误状态: {0}")]
    Status(reqwest::StatusCode),

    /// 响应体无法解析为 JSON
    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 响应结构与约定不符
    #[error("上游响应格式异常: {0}")]
    Malformed(String),
}

/// HTTP 接口错误
///
/// `Display` 即返回给调用方的错误信息，不暴露上游细节
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Ticker '{ticker}' not found or no data available.")]
    NotFound { ticker: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("AI service offline (GROQ_API_KEY missing).")]
    ChatUnavailable,

    #[error("Internal error when fetching data for {ticker}.")]
    QuoteFailed { ticker: String },

    #[error("Internal Groq API error.")]
    ChatFailed,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ChatUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::QuoteFailed { .. } | ApiError::ChatFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}
