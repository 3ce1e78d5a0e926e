//! 通用 API 响应模型
//!
//! 定义健康检查与错误响应格式

use serde::{Deserialize, Serialize};
use chrono::Utc;
use chrono_tz::Asia::Kolkata;

/// 获取印度标准时间（UTC+5:30）
fn get_india_time() -> chrono::DateTime<chrono_tz::Tz> {
    Utc::now().with_timezone(&Kolkata)
}

/// 统一 API 响应结构
///
/// 用于非数据类接口（如健康检查），包含：
/// - success: 请求是否成功
/// - data: 响应数据（成功时有值）
/// - message: 响应消息
/// - timestamp: 响应时间戳（印度标准时间）
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 请求是否成功
    pub success: bool,
    /// 响应数据
    pub data: Option<T>,
    /// 响应消息
    pub message: String,
    /// 响应时间戳（ISO 8601 格式）
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    ///
    /// # 参数
    /// - data: 响应数据
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            timestamp: get_india_time().to_rfc3339(),
        }
    }
}

/// 错误响应体
///
/// 前端读取 detail 字段展示错误信息
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }
}

/// 首页状态消息（未部署前端时返回）
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}
