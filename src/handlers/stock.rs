//! 股票接口处理器
//!
//! ## API 列表
//! - GET /companies - 获取支持的公司列表
//! - GET /data/{symbol} - 获取最近 30 个交易日数据
//! - GET /summary/{symbol} - 获取 52 周摘要
//! - GET /compare?symbol1=&symbol2= - 对比两只股票

use actix_web::{web, HttpResponse, ResponseError, Result};
use crate::models::CompareQuery;
use crate::services::stock::MarketDataProvider;
use crate::services::stock_service;

/// 获取公司目录
///
/// GET /companies
pub async fn list_companies() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(stock_service::list_companies()))
}

/// 获取最近 30 个交易日数据
///
/// GET /data/{symbol}
///
/// # 参数
/// - symbol: NSE 代码（如 TCS），不区分大小写
pub async fn get_stock_data(
    path: web::Path<String>,
    provider: web::Data<dyn MarketDataProvider>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();

    match stock_service::get_recent_data(provider.get_ref(), &symbol).await {
        Ok(data) => Ok(HttpResponse::Ok().json(data)),
        Err(e) => Ok(e.error_response()),
    }
}

/// 获取 52 周摘要
///
/// GET /summary/{symbol}
pub async fn get_stock_summary(
    path: web::Path<String>,
    provider: web::Data<dyn MarketDataProvider>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();

    match stock_service::get_summary(provider.get_ref(), &symbol).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(summary)),
        Err(e) => Ok(e.error_response()),
    }
}

/// 对比两只股票
///
/// GET /compare?symbol1=TCS&symbol2=INFY
pub async fn compare_stocks(
    query: web::Query<CompareQuery>,
    provider: web::Data<dyn MarketDataProvider>,
) -> Result<HttpResponse> {
    match stock_service::compare_stocks(provider.get_ref(), &query.symbol1, &query.symbol2).await {
        Ok(comparison) => Ok(HttpResponse::Ok().json(comparison)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/companies", web::get().to(list_companies))
        .route("/data/{symbol}", web::get().to(get_stock_data))
        .route("/summary/{symbol}", web::get().to(get_stock_summary))
        .route("/compare", web::get().to(compare_stocks));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::provider_data;
    use crate::services::stock::provider::testing::{bar, StaticProvider};
    use actix_web::{http::StatusCode, test, App};

    fn provider() -> StaticProvider {
        let closes: Vec<f64> = (0..40).map(|v| 3500.0 + v as f64 * 10.0).collect();
        StaticProvider::new()
            .with_closes("TCS.NS", &closes)
            .with_bars("INFY.NS", vec![bar(1, 100.0, 100.0), bar(2, 100.0, 110.0)])
    }

    #[actix_web::test]
    async fn test_companies() {
        let app = test::init_service(App::new().configure(config)).await;
        let req = test::TestRequest::get().uri("/companies").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let companies = body.as_array().unwrap();
        assert_eq!(companies.len(), 20);
        assert_eq!(companies[0]["symbol"], "RELIANCE");
        assert_eq!(companies[1]["name"], "Tata Consultancy Services");
    }

    #[actix_web::test]
    async fn test_data_returns_last_30_records() {
        let app = test::init_service(
            App::new().app_data(provider_data(provider())).configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/data/tcs").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["symbol"], "TCS");
        let records = body["records"].as_array().unwrap();
        assert_eq!(records.len(), 30);
        assert_eq!(records[0]["Date"], "2024-01-11");
        assert_eq!(records[29]["Close"], 3890.0);
        for key in ["Open", "High", "Low", "Volume", "Daily Return", "7 Day MA"] {
            assert!(records[0].get(key).is_some(), "missing {}", key);
        }
    }

    #[actix_web::test]
    async fn test_data_not_found_suggests_catalog_entries() {
        let app = test::init_service(
            App::new().app_data(provider_data(provider())).configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/data/tc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("Did you mean"));
        assert!(detail.contains("TCS (Tata Consultancy Services)"));
    }

    #[actix_web::test]
    async fn test_summary() {
        let app = test::init_service(
            App::new().app_data(provider_data(provider())).configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/summary/infy").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["symbol"], "INFY");
        assert_eq!(body["52_week_high"], 110.0);
        assert_eq!(body["52_week_low"], 100.0);
        assert_eq!(body["average_close"], 105.0);

        let req = test::TestRequest::get().uri("/summary/unknown").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Stock symbol not found");
    }

    #[actix_web::test]
    async fn test_compare() {
        let app = test::init_service(
            App::new().app_data(provider_data(provider())).configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/compare?symbol1=infy&symbol2=tcs")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["stock_1"], "INFY");
        assert_eq!(body["stock_2"], "TCS");
        assert_eq!(body["30_day_return"]["INFY"], 0.1);
        assert_eq!(body["average_close"]["INFY"], 105.0);
        assert_eq!(body["volatility"]["TCS"], 0.0);
    }

    #[actix_web::test]
    async fn test_compare_errors() {
        let app = test::init_service(
            App::new().app_data(provider_data(provider())).configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/compare?symbol1=tcs&symbol2=nope")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "One or both stock symbols not found");

        let req = test::TestRequest::get().uri("/compare?symbol1=tcs").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
