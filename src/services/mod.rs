//! 业务逻辑服务模块
//!
//! 封装数据获取和处理逻辑

pub mod stock;          // 行情获取与清洗
pub mod stock_service;  // 查询接口业务逻辑
