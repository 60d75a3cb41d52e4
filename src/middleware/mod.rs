//! 中间件

use actix_cors::Cors;

/// 跨域配置：允许所有来源、方法和请求头
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
        .max_age(86400)
}
