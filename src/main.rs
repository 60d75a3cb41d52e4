//! 金融行情与 AI 助手后端服务
//!
//! 提供股票报价和 AI 问答的 RESTful API，并托管前端静态页面
//! 数据来源：Yahoo Finance（行情）、Groq（大模型补全）

mod config;     // 配置加载
mod error;      // 错误类型
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务
mod state;      // 处理器共享状态

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::AppConfig;
use crate::services::chat::GroqClient;
use crate::services::chat_service::ChatService;
use crate::services::stock::YahooClient;
use crate::services::stock_service::StockService;
use crate::state::AppState;

/// 根据配置构建上游客户端，凭证缺失时聊天服务为 None
fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let yahoo = YahooClient::new(&config.api, &config.market)?;
    let stock = StockService::new(Arc::new(yahoo), config.market.lookback_days);

    let chat = match config.completion.credential() {
        Some(api_key) => {
            let groq = GroqClient::new(&config.api, &config.completion, api_key)?;
            log::info!("AI 助手已启用，模型: {}", config.completion.model);
            Some(ChatService::new(Arc::new(groq), &config.completion))
        }
        None => {
            log::warn!("未设置 GROQ_API_KEY 环境变量，AI 助手接口将返回 503");
            None
        }
    };

    Ok(AppState { stock, chat })
}

/// 应用程序入口
///
/// 启动 HTTP 服务器，默认监听 0.0.0.0:5000
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // 初始化日志系统，默认日志级别为 info
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::load();
    let state = web::Data::new(build_state(&config)?);

    let bind_addr = config.bind_addr();
    let static_dir = config.server.static_dir.clone();

    log::info!("启动金融行情后端服务，监听 {}，静态目录 {}", bind_addr, static_dir);

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::cors())  // 允许跨域
            .wrap(Logger::default())  // 添加请求日志中间件
            .app_data(state.clone())
            .configure(handlers::config)  // 配置 API 路由
            .service(handlers::static_files(&static_dir))
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_addr)?.run().await?;
    Ok(())
}
