//! 股票数据模型
//!
//! 定义股票相关的数据结构，包括：
//! - 公司目录条目
//! - 日K线（原始 / 清洗后）
//! - 各接口的响应结构

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// 公司目录条目
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Company {
    /// NSE 股票代码（不含交易所后缀）
    pub symbol: &'static str,
    /// 公司名称
    pub name: &'static str,
}

/// 数据源返回的原始日K线
///
/// 数据源缺失的字段为 None，由清洗流程前向填充
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    /// 交易日（交易所当地日期）
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

/// 清洗后的单日数据
///
/// 序列化字段名与前端约定保持一致
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimeSeriesRow {
    /// 日期（YYYY-MM-DD）
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// 开盘价
    #[serde(rename = "Open")]
    pub open: Option<f64>,
    /// 最高价
    #[serde(rename = "High")]
    pub high: Option<f64>,
    /// 最低价
    #[serde(rename = "Low")]
    pub low: Option<f64>,
    /// 收盘价
    #[serde(rename = "Close")]
    pub close: Option<f64>,
    /// 成交量
    #[serde(rename = "Volume")]
    pub volume: Option<u64>,
    /// 日内收益率 (close - open) / open
    #[serde(rename = "Daily Return")]
    pub daily_return: Option<f64>,
    /// 7 日收盘均线，前 6 行为空
    #[serde(rename = "7 Day MA")]
    pub moving_average_7: Option<f64>,
}

/// 单只股票在某一周期内的序列，按日期升序
pub type StockSeries = Vec<TimeSeriesRow>;

/// GET /data/{symbol} 响应
#[derive(Debug, Serialize, Deserialize)]
pub struct RecentDataResponse {
    pub symbol: String,
    pub records: Vec<TimeSeriesRow>,
}

/// GET /summary/{symbol} 响应
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StockSummary {
    pub symbol: String,
    #[serde(rename = "52_week_high")]
    pub week_52_high: Option<f64>,
    #[serde(rename = "52_week_low")]
    pub week_52_low: Option<f64>,
    pub average_close: Option<f64>,
}

/// GET /compare 响应
///
/// 三组指标均以大写股票代码为键，键顺序与请求参数一致
#[derive(Debug, Serialize)]
pub struct StockComparison {
    pub stock_1: String,
    pub stock_2: String,
    pub average_close: SymbolMetrics,
    pub volatility: SymbolMetrics,
    #[serde(rename = "30_day_return")]
    pub period_return: SymbolMetrics,
}

/// 按股票代码排列的单项指标
///
/// 保持插入顺序，同一代码重复插入时覆盖原值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolMetrics(Vec<(String, Option<f64>)>);

impl SymbolMetrics {
    pub fn insert(&mut self, symbol: String, value: Option<f64>) {
        match self.0.iter_mut().find(|(s, _)| *s == symbol) {
            Some(entry) => entry.1 = value,
            None => self.0.push((symbol, value)),
        }
    }

}

#[cfg(test)]
impl SymbolMetrics {
    pub fn get(&self, symbol: &str) -> Option<&Option<f64>> {
        self.0.iter().find(|(s, _)| s == symbol).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Serialize for SymbolMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (symbol, value) in &self.0 {
            map.serialize_entry(symbol, value)?;
        }
        map.end()
    }
}

/// 对比查询参数
#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub symbol1: String,
    pub symbol2: String,
}
