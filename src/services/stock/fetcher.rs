//! 日K线获取与清洗
//!
//! 数据源返回的原始K线在这里整理成可直接序列化的序列：
//! 1. 按日期升序排列
//! 2. 各列前向填充缺失值（首行缺失不回填）
//! 3. 计算日内收益率与 7 日均线
//! 4. 非有限数值统一置空，保证输出是合法 JSON

use thiserror::Error;

use super::provider::{MarketDataProvider, Period};
use crate::models::{RawBar, StockSeries, TimeSeriesRow};

/// 均线窗口长度
pub const MOVING_AVERAGE_WINDOW: usize = 7;

/// 数据源无数据或请求失败
///
/// 不区分代码无效、退市或数据源故障
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no data returned for symbol")]
pub struct SeriesNotFound;

/// 获取并清洗日K线
///
/// symbol 需带交易所后缀（如 TCS.NS）。数据源的任何错误都在此吸收，只返回 SeriesNotFound
pub async fn fetch_stock_data(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    period: Period,
) -> Result<StockSeries, SeriesNotFound> {
    let bars = match provider.daily_bars(symbol, period).await {
        Ok(bars) => bars,
        Err(e) => {
            log::warn!("获取 {} ({}) 日K线失败: {:#}", symbol, period, e);
            return Err(SeriesNotFound);
        }
    };

    if bars.is_empty() {
        log::info!("{} ({}) 无K线数据", symbol, period);
        return Err(SeriesNotFound);
    }

    Ok(build_series(bars))
}

/// 由原始K线构建清洗后的序列
pub fn build_series(mut bars: Vec<RawBar>) -> StockSeries {
    bars.sort_by_key(|bar| bar.date);
    forward_fill(&mut bars);

    let closes: Vec<Option<f64>> = bars.iter().map(|bar| bar.close).collect();
    let averages = rolling_mean(&closes, MOVING_AVERAGE_WINDOW);

    bars.into_iter()
        .zip(averages)
        .map(|(bar, moving_average_7)| {
            let daily_return = match (bar.open, bar.close) {
                (Some(open), Some(close)) => Some((close - open) / open),
                _ => None,
            };
            TimeSeriesRow {
                date: bar.date,
                open: finite(bar.open),
                high: finite(bar.high),
                low: finite(bar.low),
                close: finite(bar.close),
                volume: bar.volume,
                daily_return: finite(daily_return),
                moving_average_7: finite(moving_average_7),
            }
        })
        .collect()
}

/// 各列独立前向填充，使用该列最近一个有效值
pub fn forward_fill(bars: &mut [RawBar]) {
    let mut open = None;
    let mut high = None;
    let mut low = None;
    let mut close = None;
    let mut volume = None;

    for bar in bars.iter_mut() {
        fill(&mut bar.open, &mut open);
        fill(&mut bar.high, &mut high);
        fill(&mut bar.low, &mut low);
        fill(&mut bar.close, &mut close);
        fill(&mut bar.volume, &mut volume);
    }
}

fn fill<T: Copy>(value: &mut Option<T>, last: &mut Option<T>) {
    if value.is_some() {
        *last = *value;
    } else {
        *value = *last;
    }
}

/// 尾随窗口均值，窗口不满或含缺失值时为 None
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let sum = slice.iter().try_fold(0.0, |acc, v| v.map(|v| acc + v))?;
            Some(sum / window as f64)
        })
        .collect()
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
