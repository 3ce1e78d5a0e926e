//! 股票数据服务模块
//!
//! 行情数据源、K线清洗、统计指标与公司目录

pub mod catalog;
pub mod fetcher;
pub mod metrics;
pub mod provider;
pub mod yahoo;

// 重新导出常用类型，保持对外接口一致
pub use fetcher::fetch_stock_data;
pub use provider::{MarketDataProvider, Period};
pub use yahoo::YahooChartProvider;
