//! 业务逻辑服务模块
//!
//! 封装上游数据获取和处理逻辑

pub mod stock;          // 行情数据源
pub mod stock_service;  // 股票报价服务
pub mod chat;           // 大模型补全客户端
pub mod chat_service;   // 聊天服务
