//! 处理器共享状态
//!
//! 启动时构建一次，只读

use crate::services::chat_service::ChatService;
use crate::services::stock_service::StockService;

pub struct AppState {
    pub stock: StockService,
    /// 未配置补全服务凭证时为 None，聊天接口返回 503
    pub chat: Option<ChatService>,
}
