//! 股票报价服务
//!
//! 调用行情数据源获取元数据和近 30 天历史，并整理成固定的对外结构

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::error::UpstreamError;
use crate::models::{HistoricalDataPoint, QuoteRecord, TickerInfo};
use crate::services::stock::MarketDataClient;

/// 历史数据最多保留的交易日数
pub const MAX_HISTORY_POINTS: usize = 30;

/// 报价查询失败原因
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("代码无价格数据")]
    NotFound,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// 相对昨收的涨跌幅（小数形式）
///
/// 任一输入缺失或为 0、结果非有限值时返回 0
pub fn change_ratio(current: Option<f64>, previous: Option<f64>) -> f64 {
    match (current, previous) {
        (Some(current), Some(previous)) if current != 0.0 && previous != 0.0 => {
            let ratio = (current - previous) / previous;
            if ratio.is_finite() { ratio } else { 0.0 }
        }
        _ => 0.0,
    }
}

/// 将上游元数据和历史数据整理为对外报价
///
/// 纯函数，不做任何 I/O
pub fn normalize_quote(
    symbol: &str,
    info: &TickerInfo,
    mut history: Vec<HistoricalDataPoint>,
) -> QuoteRecord {
    history.sort_by_key(|point| point.date);
    // 只保留最近的交易日
    let excess = history.len().saturating_sub(MAX_HISTORY_POINTS);
    history.drain(..excess);

    let current_price = info.price();

    QuoteRecord {
        symbol: info.symbol.clone().unwrap_or_else(|| symbol.to_string()),
        current_price,
        market_cap: info.market_cap,
        trailing_pe: info.trailing_pe,
        fifty_two_week_high: info.fifty_two_week_high,
        fifty_two_week_low: info.fifty_two_week_low,
        volume: info.traded_volume(),
        exchange: info.exchange.clone(),
        regular_market_change_percent: change_ratio(current_price, info.prev_close()),
        historical_data: history,
    }
}

/// 股票报价服务
#[derive(Clone)]
pub struct StockService {
    client: Arc<dyn MarketDataClient>,
    lookback_days: i64,
}

impl StockService {
    pub fn new(client: Arc<dyn MarketDataClient>, lookback_days: i64) -> Self {
        Self { client, lookback_days }
    }

    /// 获取单只股票报价
    ///
    /// `symbol` 须已转为大写；历史区间为 `[today - lookback, today)`
    pub async fn get_quote(&self, symbol: &str, today: NaiveDate) -> Result<QuoteRecord, QuoteError> {
        let info = self.client.fetch_info(symbol).await?;

        if !info.has_price() {
            return Err(QuoteError::NotFound);
        }

        let start = today - Duration::days(self.lookback_days);
        let history = self.client.fetch_history(symbol, start, today).await?;

        Ok(normalize_quote(symbol, &info, history))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 行情数据源的测试替身
    #[derive(Default)]
    pub struct MockMarketData {
        pub info: TickerInfo,
        pub history: Vec<HistoricalDataPoint>,
        pub fail: bool,
        pub fail_history: bool,
        pub calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MarketDataClient for MockMarketData {
        async fn fetch_info(&self, symbol: &str) -> Result<TickerInfo, UpstreamError> {
            self.calls.lock().unwrap().push(format!("info:{}", symbol));
            if self.fail {
                return Err(UpstreamError::Malformed("mock failure".to_string()));
            }
            Ok(self.info.clone())
        }

        async fn fetch_history(
            &self,
            symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<HistoricalDataPoint>, UpstreamError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("history:{}:{}:{}", symbol, start, end));
            if self.fail_history {
                return Err(UpstreamError::Status(reqwest::StatusCode::BAD_GATEWAY));
            }
            Ok(self.history.clone())
        }
    }

    pub fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    pub fn aapl_info() -> TickerInfo {
        TickerInfo {
            symbol: Some("AAPL".into()),
            current_price: Some(150.0),
            previous_close: Some(100.0),
            market_cap: Some(2.5e12),
            trailing_pe: Some(28.4),
            fifty_two_week_high: Some(199.6),
            fifty_two_week_low: Some(124.2),
            volume: Some(48_000_000.0),
            exchange: Some("NMS".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_change_ratio() {
        assert_eq!(change_ratio(Some(150.0), Some(100.0)), 0.5);
        assert_eq!(change_ratio(Some(90.0), Some(100.0)), -0.1);
        assert_eq!(change_ratio(Some(150.0), Some(0.0)), 0.0);
        assert_eq!(change_ratio(Some(0.0), Some(100.0)), 0.0);
        assert_eq!(change_ratio(Some(150.0), None), 0.0);
        assert_eq!(change_ratio(None, Some(100.0)), 0.0);
        assert_eq!(change_ratio(Some(f64::INFINITY), Some(1.0)), 0.0);
        assert_eq!(change_ratio(Some(f64::NAN), Some(1.0)), 0.0);
    }

    #[test]
    fn test_normalize_full_record() {
        println!("\n========== 测试报价整理 ==========");
        let history = vec![
            HistoricalDataPoint { date: day(4), close: 148.0 },
            HistoricalDataPoint { date: day(1), close: 146.0 },
        ];

        let record = normalize_quote("AAPL", &aapl_info(), history);
        println!("  {:?}", record);

        assert_eq!(record.symbol, "AAPL");
        assert_eq!(record.current_price, Some(150.0));
        assert_eq!(record.regular_market_change_percent, 0.5);
        assert_eq!(record.volume, Some(48_000_000.0));
        assert_eq!(record.historical_data[0].date, day(1));
        assert_eq!(record.historical_data[1].date, day(4));
        println!("✅ 报价整理测试通过！");
    }

    #[test]
    fn test_normalize_missing_previous_close() {
        let info = TickerInfo {
            regular_market_price: Some(42.0),
            regular_market_volume: Some(7.0),
            ..Default::default()
        };

        let record = normalize_quote("MSFT", &info, Vec::new());
        assert_eq!(record.symbol, "MSFT");
        assert_eq!(record.current_price, Some(42.0));
        assert_eq!(record.regular_market_change_percent, 0.0);
        assert_eq!(record.volume, Some(7.0));
        assert!(record.historical_data.is_empty());
    }

    #[test]
    fn test_normalize_zero_previous_close() {
        let info = TickerInfo {
            current_price: Some(5.0),
            previous_close: Some(0.0),
            ..Default::default()
        };
        let record = normalize_quote("PENNY", &info, Vec::new());
        assert!(record.regular_market_change_percent.is_finite());
        assert_eq!(record.regular_market_change_percent, 0.0);
    }

    #[test]
    fn test_normalize_caps_history() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let history: Vec<_> = (0..45)
            .rev()
            .map(|i| HistoricalDataPoint { date: start + Duration::days(i), close: i as f64 })
            .collect();

        let record = normalize_quote("AAPL", &aapl_info(), history);

        assert_eq!(record.historical_data.len(), MAX_HISTORY_POINTS);
        assert!(record.historical_data.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(record.historical_data.last().unwrap().close, 44.0);
    }

    #[tokio::test]
    async fn test_get_quote_requests_lookback_window() {
        let mock = Arc::new(MockMarketData { info: aapl_info(), ..Default::default() });
        let service = StockService::new(mock.clone(), 30);

        let record = service.get_quote("AAPL", day(31)).await.unwrap();
        assert_eq!(record.regular_market_change_percent, 0.5);

        let calls = mock.calls.lock().unwrap();
        assert_eq!(calls[0], "info:AAPL");
        assert_eq!(calls[1], "history:AAPL:2024-03-01:2024-03-31");
    }

    #[tokio::test]
    async fn test_get_quote_not_found_skips_history() {
        let mock = Arc::new(MockMarketData::default());
        let service = StockService::new(mock.clone(), 30);

        let result = service.get_quote("ZZZZ", day(31)).await;
        assert!(matches!(result, Err(QuoteError::NotFound)));
        assert_eq!(mock.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_quote_upstream_failure() {
        let mock = Arc::new(MockMarketData { fail: true, ..Default::default() });
        let service = StockService::new(mock, 30);

        let result = service.get_quote("AAPL", day(31)).await;
        assert!(matches!(result, Err(QuoteError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_get_quote_history_failure() {
        let mock = Arc::new(MockMarketData {
            info: aapl_info(),
            fail_history: true,
            ..Default::default()
        });
        let service = StockService::new(mock.clone(), 30);

        let result = service.get_quote("AAPL", day(31)).await;
        assert!(matches!(result, Err(QuoteError::Upstream(UpstreamError::Status(_)))));
        assert_eq!(mock.calls.lock().unwrap().len(), 2);
    }
}
