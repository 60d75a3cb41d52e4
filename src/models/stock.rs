//! 股票数据模型
//!
//! 定义上游行情元数据与对外输出的报价结构

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 上游返回的股票元数据
///
/// 上游字段随品种和时段变化，全部可缺省；
/// 同义字段的取值优先级由下方方法集中定义
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerInfo {
    pub symbol: Option<String>,
    pub current_price: Option<f64>,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub volume: Option<f64>,
    pub regular_market_volume: Option<f64>,
    pub exchange: Option<String>,
}

impl TickerInfo {
    /// 当前价：currentPrice → regularMarketPrice
    pub fn price(&self) -> Option<f64> {
        self.current_price.or(self.regular_market_price)
    }

    /// 是否有任何价格数据，用于判断代码是否存在
    pub fn has_price(&self) -> bool {
        self.price().is_some()
    }

    /// 昨收：previousClose → regularMarketPreviousClose → 当前价
    pub fn prev_close(&self) -> Option<f64> {
        self.previous_close
            .or(self.regular_market_previous_close)
            .or_else(|| self.price())
    }

    /// 成交量：volume → regularMarketVolume
    pub fn traded_volume(&self) -> Option<f64> {
        self.volume.or(self.regular_market_volume)
    }
}

/// 历史收盘价数据点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDataPoint {
    /// 交易日（YYYY-MM-DD）
    pub date: NaiveDate,
    /// 收盘价
    pub close: f64,
}

/// 对外输出的股票报价
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    /// 股票代码
    pub symbol: String,
    /// 当前价格
    pub current_price: Option<f64>,
    /// 市值
    pub market_cap: Option<f64>,
    /// 滚动市盈率
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    /// 52 周最高
    pub fifty_two_week_high: Option<f64>,
    /// 52 周最低
    pub fifty_two_week_low: Option<f64>,
    /// 成交量
    pub volume: Option<f64>,
    /// 交易所
    pub exchange: Option<String>,
    /// 相对昨收的涨跌幅（小数，0.5 表示 +50%）
    pub regular_market_change_percent: f64,
    /// 近 30 天收盘价，按日期升序
    pub historical_data: Vec<HistoricalDataPoint>,
}
