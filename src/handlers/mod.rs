pub mod stock;
pub mod chat;

use actix_files::Files;
use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(stock::config)
            .configure(chat::config)
    );
}

/// 前端静态文件，根路径返回 index.html
///
/// 须在所有 API 路由之后注册
pub fn static_files(root: &str) -> Files {
    Files::new("/", root).index_file("index.html")
}
