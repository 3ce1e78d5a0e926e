//! 股票查询服务
//!
//! 公司目录、近 30 日数据、52 周摘要与双股对比。
//! 所有接口无状态，每次请求都重新向数据源获取

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use futures::future;
use thiserror::Error;

use crate::models::{
    Company, ErrorResponse, RecentDataResponse, StockComparison, StockSummary, SymbolMetrics,
    TimeSeriesRow,
};
use crate::services::stock::catalog::{self, COMPANIES, MAX_SUGGESTIONS};
use crate::services::stock::{fetch_stock_data, metrics, MarketDataProvider, Period};

/// 近期数据返回的最大行数
pub const RECENT_RECORDS: usize = 30;

/// 查询服务错误
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 代码不存在或数据源无数据
    #[error("{0}")]
    NotFound(String),
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

/// 获取公司目录
pub fn list_companies() -> &'static [Company] {
    COMPANIES
}

/// 获取最近 30 个交易日数据
///
/// 未找到时按目录模糊匹配给出建议
pub async fn get_recent_data(
    provider: &dyn MarketDataProvider,
    symbol: &str,
) -> Result<RecentDataResponse, ServiceError> {
    let upper = symbol.to_uppercase();

    let nse_symbol = catalog::nse_symbol(symbol);

    let series = match fetch_stock_data(provider, &nse_symbol, Period::OneMonth).await {
        Ok(series) => series,
        Err(_) => return Err(ServiceError::NotFound(not_found_message(symbol))),
    };

    let skip = series.len().saturating_sub(RECENT_RECORDS);
    let records = series.into_iter().skip(skip).collect();

    Ok(RecentDataResponse {
        symbol: upper,
        records,
    })
}

/// 生成带建议的未找到提示
fn not_found_message(symbol: &str) -> String {
    let upper = symbol.to_uppercase();
    let suggestions = catalog::find_similar(symbol, MAX_SUGGESTIONS);

    if suggestions.is_empty() {
        return format!(
            "Stock symbol '{}' not found. Try: TCS, INFY, RELIANCE, TATAMOTORS, etc.",
            upper
        );
    }

    let list = suggestions
        .iter()
        .map(|c| format!("{} ({})", c.symbol, c.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Stock symbol '{}' not found. Did you mean: {}?", upper, list)
}

/// 获取 52 周摘要
pub async fn get_summary(
    provider: &dyn MarketDataProvider,
    symbol: &str,
) -> Result<StockSummary, ServiceError> {
    let series = fetch_stock_data(provider, &catalog::nse_symbol(symbol), Period::OneYear)
        .await
        .map_err(|_| ServiceError::NotFound("Stock symbol not found".to_string()))?;

    Ok(StockSummary {
        symbol: symbol.to_uppercase(),
        week_52_high: metrics::highest_high(&series),
        week_52_low: metrics::lowest_low(&series),
        average_close: metrics::average_close(&series).map(|v| metrics::round_to(v, 2)),
    })
}

/// 对比两只股票近一个月表现
///
/// 两次获取并发进行，任一失败则整体失败
pub async fn compare_stocks(
    provider: &dyn MarketDataProvider,
    symbol1: &str,
    symbol2: &str,
) -> Result<StockComparison, ServiceError> {
    let (first, second) = future::join(
        fetch_stock_data(provider, &catalog::nse_symbol(symbol1), Period::OneMonth),
        fetch_stock_data(provider, &catalog::nse_symbol(symbol2), Period::OneMonth),
    )
    .await;

    let (first, second) = match (first, second) {
        (Ok(first), Ok(second)) => (first, second),
        _ => {
            return Err(ServiceError::NotFound(
                "One or both stock symbols not found".to_string(),
            ))
        }
    };

    let sym1 = symbol1.to_uppercase();
    let sym2 = symbol2.to_uppercase();

    Ok(StockComparison {
        average_close: metric_pair((&sym1, &first), (&sym2, &second), metrics::average_close, 2),
        volatility: metric_pair((&sym1, &first), (&sym2, &second), metrics::volatility, 4),
        period_return: metric_pair((&sym1, &first), (&sym2, &second), metrics::period_return, 4),
        stock_1: sym1,
        stock_2: sym2,
    })
}

/// 按股票代码汇总同一指标，保留指定小数位
fn metric_pair(
    (sym1, first): (&str, &[TimeSeriesRow]),
    (sym2, second): (&str, &[TimeSeriesRow]),
    metric: fn(&[TimeSeriesRow]) -> Option<f64>,
    decimals: i32,
) -> SymbolMetrics {
    let mut pair = SymbolMetrics::default();
    pair.insert(sym1.to_string(), metric(first).map(|v| metrics::round_to(v, decimals)));
    pair.insert(sym2.to_string(), metric(second).map(|v| metrics::round_to(v, decimals)));
    pair
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stock::provider::testing::{bar, StaticProvider};

    #[test]
    fn test_list_companies_returns_catalog() {
        let companies = list_companies();
        assert_eq!(companies.len(), 20);
        assert_eq!(companies, list_companies());
        assert_eq!(companies[1].symbol, "TCS");
    }

    #[tokio::test]
    async fn test_recent_data_keeps_last_30_rows() {
        let closes: Vec<f64> = (0..45).map(|v| 100.0 + v as f64).collect();
        let provider = StaticProvider::new().with_closes("TCS.NS", &closes);

        let data = get_recent_data(&provider, "tcs").await.unwrap();
        assert_eq!(data.symbol, "TCS");
        assert_eq!(data.records.len(), RECENT_RECORDS);
        assert_eq!(data.records[0].close, Some(115.0));
        assert_eq!(data.records[29].close, Some(144.0));
        assert!(data.records.windows(2).all(|w| w[0].date < w[1].date));
        // 均线基于完整序列计算
        assert!(data.records[0].moving_average_7.is_some());

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0], ("TCS.NS".to_string(), Period::OneMonth));
    }

    #[tokio::test]
    async fn test_recent_data_short_series() {
        let provider = StaticProvider::new().with_closes("INFY.NS", &[1.0, 2.0, 3.0]);
        let data = get_recent_data(&provider, "INFY").await.unwrap();
        assert_eq!(data.records.len(), 3);
    }

    #[tokio::test]
    async fn test_recent_data_not_found_with_suggestions() {
        let provider = StaticProvider::new();
        let err = get_recent_data(&provider, "tc").await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Stock symbol 'TC' not found. Did you mean: "));
        assert!(message.contains("TCS (Tata Consultancy Services)"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_recent_data_not_found_caps_suggestions() {
        let provider = StaticProvider::new();
        let message = get_recent_data(&provider, "tata").await.unwrap_err().to_string();
        let list = message.split("Did you mean: ").nth(1).unwrap();
        assert_eq!(list.split(", ").count(), MAX_SUGGESTIONS);
    }

    #[tokio::test]
    async fn test_recent_data_not_found_without_suggestions() {
        let provider = StaticProvider::new().failing("XYZ.NS");
        let message = get_recent_data(&provider, "xyz").await.unwrap_err().to_string();
        assert_eq!(
            message,
            "Stock symbol 'XYZ' not found. Try: TCS, INFY, RELIANCE, TATAMOTORS, etc."
        );
    }

    #[tokio::test]
    async fn test_summary() {
        let provider = StaticProvider::new().with_bars(
            "SBIN.NS",
            vec![bar(1, 600.0, 610.0), bar(2, 610.0, 650.0), bar(3, 650.0, 580.0)],
        );
        let summary = get_summary(&provider, "sbin").await.unwrap();
        assert_eq!(
            summary,
            StockSummary {
                symbol: "SBIN".to_string(),
                week_52_high: Some(650.0),
                week_52_low: Some(580.0),
                average_close: Some(613.33),
            }
        );
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0].1, Period::OneYear);
    }

    #[tokio::test]
    async fn test_summary_constant_series() {
        let provider = StaticProvider::new().with_closes("ITC.NS", &[432.5; 250]);
        let summary = get_summary(&provider, "ITC").await.unwrap();
        assert_eq!(summary.average_close, Some(432.5));
    }

    #[tokio::test]
    async fn test_summary_not_found() {
        let provider = StaticProvider::new();
        let err = get_summary(&provider, "tc").await.unwrap_err();
        assert_eq!(err.to_string(), "Stock symbol not found");
    }

    #[tokio::test]
    async fn test_compare() {
        let provider = StaticProvider::new()
            .with_bars(
                "TCS.NS",
                vec![bar(1, 100.0, 100.0), bar(2, 100.0, 105.0), bar(3, 105.0, 110.0)],
            )
            .with_closes("INFY.NS", &[50.0; 20]);

        let result = compare_stocks(&provider, "tcs", "infy").await.unwrap();
        assert_eq!(result.stock_1, "TCS");
        assert_eq!(result.stock_2, "INFY");
        assert_eq!(result.period_return.get("TCS"), Some(&Some(0.1)));
        assert_eq!(result.period_return.get("INFY"), Some(&Some(0.0)));
        assert_eq!(result.average_close.get("TCS"), Some(&Some(105.0)));
        assert_eq!(result.average_close.get("INFY"), Some(&Some(50.0)));
        assert_eq!(result.volatility.get("INFY"), Some(&Some(0.0)));
        // 收益率 0, 0.05, 0.047619 -> 样本标准差约 0.0282
        assert_eq!(result.volatility.get("TCS"), Some(&Some(0.0282)));
    }

    #[tokio::test]
    async fn test_compare_fails_when_either_missing() {
        let provider = StaticProvider::new().with_closes("TCS.NS", &[1.0, 2.0]);
        let err = compare_stocks(&provider, "tcs", "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "One or both stock symbols not found");

        let err = compare_stocks(&provider, "nope", "tcs").await.unwrap_err();
        assert_eq!(err.to_string(), "One or both stock symbols not found");
        assert_eq!(provider.calls.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_compare_serializes_metric_groups() {
        let provider = StaticProvider::new()
            .with_closes("TCS.NS", &[1.0])
            .with_closes("LT.NS", &[2.0, 2.0]);
        let result = compare_stocks(&provider, "TCS", "lt").await.unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["stock_1"], "TCS");
        assert_eq!(value["30_day_return"]["LT"], 0.0);
        // 单行序列无法计算样本标准差
        assert!(value["volatility"]["TCS"].is_null());
    }

    #[tokio::test]
    async fn test_compare_keeps_request_order() {
        let provider = StaticProvider::new()
            .with_closes("TCS.NS", &[100.0, 110.0])
            .with_closes("INFY.NS", &[50.0, 50.0]);
        let result = compare_stocks(&provider, "tcs", "infy").await.unwrap();
        let json = serde_json::to_string(&result).unwrap();

        for group in ["average_close", "volatility", "30_day_return"] {
            let start = json.find(&format!("\"{}\"", group)).unwrap();
            let rest = &json[start..];
            let tcs = rest.find("\"TCS\"").unwrap();
            let infy = rest.find("\"INFY\"").unwrap();
            assert!(tcs < infy, "{} 顺序错误: {}", group, json);
        }
    }

    #[tokio::test]
    async fn test_compare_same_symbol_twice() {
        let provider = StaticProvider::new().with_closes("TCS.NS", &[100.0, 110.0]);
        let result = compare_stocks(&provider, "TCS", "tcs").await.unwrap();
        assert_eq!(result.average_close.len(), 1);
        assert_eq!(result.period_return.get("TCS"), Some(&Some(0.1)));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["average_close"].as_object().unwrap().len(), 1);
    }
}
