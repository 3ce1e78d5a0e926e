//! 首页与前端静态文件
//!
//! 前端目录存在时：
//! - GET / 返回 index.html
//! - GET /static/* 返回目录下的文件
//!
//! 目录不存在时首页返回运行状态消息

use std::path::Path;

use actix_files::{Files, NamedFile};
use actix_web::{web, HttpRequest, HttpResponse, Result};

use crate::config::FrontendConfig;
use crate::models::StatusMessage;

/// GET /
pub async fn index(req: HttpRequest, frontend: web::Data<FrontendConfig>) -> Result<HttpResponse> {
    let index_path = Path::new(&frontend.static_dir).join("index.html");

    if index_path.is_file() {
        let file = NamedFile::open_async(&index_path).await?;
        return Ok(file.into_response(&req));
    }

    Ok(HttpResponse::Ok().json(StatusMessage {
        message: "Stock Data API is running. See /companies for supported symbols.".to_string(),
    }))
}

/// 挂载 /static，目录不存在时静默跳过
pub fn mount_static(cfg: &mut web::ServiceConfig, static_dir: &str) {
    if Path::new(static_dir).is_dir() {
        log::debug!("挂载前端静态目录: {}", static_dir);
        cfg.service(Files::new("/static", static_dir));
    } else {
        log::debug!("前端目录 {} 不存在，跳过静态文件服务", static_dir);
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index));
}
