//! 行情数据源抽象
//!
//! 数据获取层只依赖该 trait，生产环境使用 Yahoo Finance 实现，测试中替换为内存数据源

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::RawBar;

/// 回看周期，取值与数据源的 range 参数一致
///
/// 近期数据与对比用一个月，摘要用一年
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    OneMonth,
    OneYear,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::OneYear => "1y",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 日K线数据源
///
/// symbol 为带交易所后缀的代码（如 TCS.NS）。
/// 未知代码可以返回空列表或错误，上层统一视为“未找到”。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn daily_bars(&self, symbol: &str, period: Period) -> Result<Vec<RawBar>>;
}
