//! Yahoo Finance 行情接口实现
//!
//! 对接 v8 K线接口：`meta` 提供元数据，`indicators` 提供日线历史。
//! 该接口无需 cookie/crumb 认证

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    Client, StatusCode, Url,
};
use serde::Deserialize;
use serde_json::Value;

use super::MarketDataClient;
use crate::config::{ApiConfig, MarketConfig};
use crate::error::UpstreamError;
use crate::models::{HistoricalDataPoint, TickerInfo};

/// Yahoo Finance 行情客户端
pub struct YahooClient {
    /// HTTP 客户端
    client: Client,
    /// K线接口根地址，股票代码作为最后一段路径追加
    chart_url: Url,
}

/// K线接口 `meta` 中用到的字段
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: Option<String>,
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
    regular_market_volume: Option<f64>,
    exchange_name: Option<String>,
}

impl From<ChartMeta> for TickerInfo {
    fn from(meta: ChartMeta) -> Self {
        TickerInfo {
            symbol: meta.symbol,
            regular_market_price: meta.regular_market_price,
            previous_close: meta.previous_close.or(meta.chart_previous_close),
            fifty_two_week_high: meta.fifty_two_week_high,
            fifty_two_week_low: meta.fifty_two_week_low,
            regular_market_volume: meta.regular_market_volume,
            exchange: meta.exchange_name,
            ..Default::default()
        }
    }
}

impl YahooClient {
    /// 创建客户端，请求头模拟浏览器访问
    pub fn new(api: &ApiConfig, market: &MarketConfig) -> Result<Self, UpstreamError> {
        let chart_url = Url::parse(&market.chart_url)
            .map_err(|e| UpstreamError::Malformed(format!("K线接口地址无效 {}: {}", market.chart_url, e)))?;
        if chart_url.cannot_be_a_base() {
            return Err(UpstreamError::Malformed(format!("K线接口地址无效: {}", market.chart_url)));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(api.timeout_secs))
            .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
            .build()?;

        Ok(Self { client, chart_url })
    }

    /// 拼接单只股票的K线地址，代码按路径段转义
    fn chart_endpoint(&self, symbol: &str) -> Result<Url, UpstreamError> {
        let mut url = self.chart_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Malformed(format!("K线接口地址无效: {}", self.chart_url)))?
            .pop_if_empty()
            .push(symbol);
        Ok(url)
    }

    /// 请求K线接口，代码不存在（404）时返回 None
    async fn get_chart(&self, symbol: &str, query: &[(&str, String)]) -> Result<Option<Value>, UpstreamError> {
        let url = self.chart_endpoint(symbol)?;
        log::debug!("📡 请求 Yahoo 接口 URL: {}", url);

        let response = self.client.get(url).query(query).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(UpstreamError::Status(response.status()));
        }

        Ok(Some(response.json().await?))
    }
}

#[async_trait]
impl MarketDataClient for YahooClient {
    async fn fetch_info(&self, symbol: &str) -> Result<TickerInfo, UpstreamError> {
        let query = [("range", "1d".to_string()), ("interval", "1d".to_string())];

        match self.get_chart(symbol, &query).await? {
            Some(data) => parse_chart_meta(&data),
            None => Ok(TickerInfo::default()),
        }
    }

    async fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HistoricalDataPoint>, UpstreamError> {
        let query = [
            ("period1", day_start_timestamp(start).to_string()),
            ("period2", day_start_timestamp(end).to_string()),
            ("interval", "1d".to_string()),
            ("events", "history".to_string()),
        ];

        match self.get_chart(symbol, &query).await? {
            Some(data) => parse_chart_response(&data),
            None => Ok(Vec::new()),
        }
    }
}

/// 日期零点（UTC）的 Unix 时间戳
fn day_start_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// 取出 `chart.result[0]`
///
/// 格式: {"chart": {"result": [{...}], "error": null}}
/// error.code 为 "Not Found" 或 result 为空时表示代码不存在
fn chart_result(data: &Value) -> Result<Option<&Value>, UpstreamError> {
    let chart = data
        .get("chart")
        .ok_or_else(|| UpstreamError::Malformed("缺少 chart 字段".to_string()))?;

    if let Some(err) = chart.get("error").filter(|e| !e.is_null()) {
        if err["code"].as_str() == Some("Not Found") {
            return Ok(None);
        }
        return Err(UpstreamError::Malformed(format!("K线接口返回错误: {}", err)));
    }

    Ok(chart["result"].as_array().and_then(|arr| arr.first()))
}

/// 解析K线接口中的元数据
fn parse_chart_meta(data: &Value) -> Result<TickerInfo, UpstreamError> {
    let meta = match chart_result(data)?.and_then(|result| result.get("meta")) {
        Some(meta) => meta,
        None => return Ok(TickerInfo::default()),
    };

    let meta: ChartMeta = serde_json::from_value(meta.clone())?;
    Ok(meta.into())
}

/// 解析K线接口中的日线历史
///
/// 格式: result[0] = {"meta": {...}, "timestamp": [...],
///        "indicators": {"quote": [{"close": [...]}]}}
/// 时间戳按交易所时区换算成交易日，收盘价为 null 的数据点跳过
fn parse_chart_response(data: &Value) -> Result<Vec<HistoricalDataPoint>, UpstreamError> {
    let result = match chart_result(data)? {
        Some(result) => result,
        None => return Ok(Vec::new()),
    };

    // 无交易日时 timestamp 字段缺失
    let timestamps = match result["timestamp"].as_array() {
        Some(ts) => ts,
        None => return Ok(Vec::new()),
    };

    let closes = result["indicators"]["quote"][0]["close"]
        .as_array()
        .ok_or_else(|| UpstreamError::Malformed("缺少收盘价序列".to_string()))?;

    let tz: Tz = result["meta"]["exchangeTimezoneName"]
        .as_str()
        .and_then(|name| name.parse().ok())
        .unwrap_or(chrono_tz::UTC);

    let mut history = Vec::with_capacity(timestamps.len());
    for (ts, close) in timestamps.iter().zip(closes) {
        let (Some(ts), Some(close)) = (ts.as_i64(), close.as_f64()) else {
            continue;
        };
        let Some(utc) = DateTime::<Utc>::from_timestamp(ts, 0) else {
            continue;
        };
        history.push(HistoricalDataPoint {
            date: tz.from_utc_datetime(&utc.naive_utc()).date_naive(),
            close,
        });
    }

    history.sort_by_key(|point| point.date);
    Ok(history)
}
