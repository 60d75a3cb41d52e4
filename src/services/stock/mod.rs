//! 股票行情数据源
//!
//! `MarketDataClient` 抽象上游行情服务，默认实现对接 Yahoo Finance

pub mod yahoo;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::UpstreamError;
use crate::models::{HistoricalDataPoint, TickerInfo};

pub use yahoo::YahooClient;

/// 行情数据客户端
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// 获取股票元数据，代码不存在时返回不含价格的空记录
    async fn fetch_info(&self, symbol: &str) -> Result<TickerInfo, UpstreamError>;

    /// 获取 `[start, end)` 区间内的日线收盘价，按日期升序
    async fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HistoricalDataPoint>, UpstreamError>;
}
