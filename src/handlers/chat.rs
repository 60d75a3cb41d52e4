//! AI 助手聊天接口
//!
//! POST /api/chat/

use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::{ChatRequest, ChatResponse};
use crate::state::AppState;

/// 转发用户消息到补全服务
///
/// 请求体在可用性检查之后才解析，未配置凭证时无论请求体如何都返回 503
pub async fn chat(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let service = state.chat.as_ref().ok_or(ApiError::ChatUnavailable)?;

    let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        log::warn!("聊天请求体解析失败: {}", e);
        ApiError::BadRequest("Request body must be a JSON object with a 'message' field.".to_string())
    })?;

    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message must not be empty.".to_string()));
    }

    match service.ask(&request.message).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ChatResponse { response })),
        Err(e) => {
            log::error!("/api/chat/ 补全接口调用失败: {}", e);
            Err(ApiError::ChatFailed)
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat/", web::post().to(chat));
}
