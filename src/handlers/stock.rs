//! 股票报价接口
//!
//! GET /api/stock/{ticker}

use actix_web::{web, HttpResponse};
use chrono::Local;

use crate::error::ApiError;
use crate::services::stock_service::QuoteError;
use crate::state::AppState;

/// 获取股票报价及近 30 天收盘价
///
/// # 参数
/// - ticker: 股票代码，不区分大小写
pub async fn get_stock_quote(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let ticker = path.into_inner().to_uppercase();
    let today = Local::now().date_naive();

    match state.stock.get_quote(&ticker, today).await {
        Ok(record) => Ok(HttpResponse::Ok().json(record)),
        Err(QuoteError::NotFound) => {
            log::info!("股票代码 {} 无行情数据", ticker);
            Err(ApiError::NotFound { ticker })
        }
        Err(QuoteError::Upstream(e)) => {
            log::error!("获取 {} 行情数据失败: {}", ticker, e);
            Err(ApiError::QuoteFailed { ticker })
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/stock/{ticker}", web::get().to(get_stock_quote));
}
