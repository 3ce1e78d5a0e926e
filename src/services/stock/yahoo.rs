//! Yahoo Finance 日K线接口实现
//!
//! 对接 https://query1.finance.yahoo.com/v8/finance/chart/<symbol>

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use chrono_tz::{Asia::Kolkata, Tz};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::provider::{MarketDataProvider, Period};
use crate::config::ProviderConfig;
use crate::models::RawBar;

/// Yahoo Finance 图表 API
pub const YAHOO_CHART_API: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// 基于 Yahoo 图表接口的日K线数据源
pub struct YahooChartProvider {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl YahooChartProvider {
    /// 按配置创建客户端，未配置超时则不限制
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let mut builder = Client::builder().gzip(true);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("创建 HTTP 客户端失败")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// 拼接图表请求地址，代码作为路径段编码
    fn build_url(&self, symbol: &str, period: Period) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("无效的数据源地址: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("无效的数据源地址: {}", self.base_url))?
            .pop_if_empty()
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("range", period.as_str())
            .append_pair("interval", "1d");
        Ok(url)
    }
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    async fn daily_bars(&self, symbol: &str, period: Period) -> Result<Vec<RawBar>> {
        let url = self.build_url(symbol, period)?;
        log::debug!("请求日K线数据 URL: {}", url);

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Referer", "https://finance.yahoo.com/")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("获取 {} 日K线失败: {}", symbol, response.status()));
        }

        let text = response.text().await?;
        let bars = parse_chart_response(&text)?;
        log::debug!("{} 解析到 {} 条K线数据", symbol, bars.len());
        Ok(bars)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "exchangeTimezoneName", default)]
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// 解析图表接口响应
///
/// - 接口返回 error 时报错
/// - 无结果时返回空列表
/// - 时间戳按交易所时区换算为交易日，默认 Asia/Kolkata
/// - 四个价格全为空的行丢弃
/// - 同一交易日出现多条时合并为一条，收盘价与成交量取后到的那条
fn parse_chart_response(body: &str) -> Result<Vec<RawBar>> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| anyhow!("解析图表数据失败: {}", e))?;

    if let Some(error) = response.chart.error {
        return Err(anyhow!("数据源错误 [{}]: {}", error.code, error.description));
    }

    let result = match response.chart.result.and_then(|r| r.into_iter().next()) {
        Some(result) => result,
        None => return Ok(Vec::new()),
    };

    let tz: Tz = result
        .meta
        .and_then(|m| m.exchange_timezone_name)
        .and_then(|name| name.parse().ok())
        .unwrap_or(Kolkata);

    let quote = match result.indicators.quote.into_iter().next() {
        Some(quote) => quote,
        None => return Ok(Vec::new()),
    };

    let value = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

    let mut bars: Vec<RawBar> = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let date = Utc
            .timestamp_opt(ts, 0)
            .single()
            .ok_or_else(|| anyhow!("无效的时间戳: {}", ts))?
            .with_timezone(&tz)
            .date_naive();

        let bar = RawBar {
            date,
            open: value(&quote.open, i),
            high: value(&quote.high, i),
            low: value(&quote.low, i),
            close: value(&quote.close, i),
            volume: value(&quote.volume, i)
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.round() as u64),
        };

        if bar.open.is_none() && bar.high.is_none() && bar.low.is_none() && bar.close.is_none() {
            continue;
        }
        match bars.iter_mut().rfind(|existing| existing.date == bar.date) {
            Some(existing) => merge_bar(existing, bar),
            None => bars.push(bar),
        }
    }

    Ok(bars)
}

/// 把同一交易日后到的K线（通常是盘中实时K线）并入已有K线
fn merge_bar(existing: &mut RawBar, later: RawBar) {
    existing.open = existing.open.or(later.open);
    existing.high = match (existing.high, later.high) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };
    existing.low = match (existing.low, later.low) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    existing.close = later.close.or(existing.close);
    existing.volume = later.volume.or(existing.volume);
}
