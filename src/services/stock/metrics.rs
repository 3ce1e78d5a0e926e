//! 序列统计指标
//!
//! 聚合时跳过缺失值；没有可用数据的指标返回 None

use crate::models::TimeSeriesRow;

/// 收盘价均值
pub fn average_close(series: &[TimeSeriesRow]) -> Option<f64> {
    mean(series.iter().filter_map(|row| row.close))
}

/// 区间最高价
pub fn highest_high(series: &[TimeSeriesRow]) -> Option<f64> {
    series.iter().filter_map(|row| row.high).reduce(f64::max)
}

/// 区间最低价
pub fn lowest_low(series: &[TimeSeriesRow]) -> Option<f64> {
    series.iter().filter_map(|row| row.low).reduce(f64::min)
}

/// 波动率：日内收益率的样本标准差（n - 1）
pub fn volatility(series: &[TimeSeriesRow]) -> Option<f64> {
    sample_std(series.iter().filter_map(|row| row.daily_return))
}

/// 区间收益率：(末行收盘 - 首行收盘) / 首行收盘
pub fn period_return(series: &[TimeSeriesRow]) -> Option<f64> {
    let first = series.first()?.close?;
    let last = series.last()?.close?;
    let value = (last - first) / first;
    value.is_finite().then_some(value)
}

pub fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

pub fn sample_std(values: impl Iterator<Item = f64>) -> Option<f64> {
    let values: Vec<f64> = values.collect();
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// 保留指定小数位，恰好一半时取偶数（银行家舍入）
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
