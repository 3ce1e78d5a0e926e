//! NSE 股票数据后端服务
//!
//! 提供印度股票日K线、52 周摘要与对比分析的只读 JSON API
//! 数据来源：Yahoo Finance

mod config;     // 配置加载
mod handlers;   // HTTP 请求处理器
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware::Logger};
use env_logger::Env;

use crate::config::{AppConfig, ConfigSource};
use crate::services::stock::{MarketDataProvider, YahooChartProvider};

/// 应用程序入口
///
/// 启动 HTTP 服务器，默认监听 0.0.0.0:8080
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let (config, source) = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    match &source {
        ConfigSource::File(path) => log::info!("从 {} 加载配置成功", path),
        ConfigSource::Default => log::info!("使用默认配置"),
    }

    let provider = YahooChartProvider::new(&config.provider)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("{:#}", e)))?;
    let provider: Arc<dyn MarketDataProvider> = Arc::new(provider);
    let provider = web::Data::from(provider);
    let frontend = web::Data::new(config.frontend.clone());

    log::info!("启动 NSE 股票数据服务，监听 {}", config.bind_addr());

    let static_dir = config.frontend.static_dir.clone();
    let mut server = HttpServer::new(move || {
        let static_dir = static_dir.clone();
        App::new()
            .wrap(Logger::default())  // 添加请求日志中间件
            .wrap(Cors::permissive())  // 只读接口，允许任意来源
            .app_data(provider.clone())
            .app_data(frontend.clone())
            .configure(handlers::config)  // 配置路由
            .configure(move |cfg| handlers::home::mount_static(cfg, &static_dir))
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(config.bind_addr())?.run().await
}
