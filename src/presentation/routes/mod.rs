// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::Extension,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::application::use_cases::scan_use_case::ScanOrchestrator;
use crate::domain::repositories::scan_repository::ScanRepository;
use crate::presentation::handlers::scan_handler;
use crate::scanner::traits::AuditRunner;

/// 创建应用路由
///
/// # 参数
///
/// * `orchestrator` - 扫描编排器
///
/// # 返回值
///
/// 返回配置好的路由
pub fn app<R, A>(orchestrator: Arc<ScanOrchestrator<R, A>>) -> Router
where
    R: ScanRepository + 'static,
    A: AuditRunner + 'static,
{
    Router::new()
        .route("/scan", post(scan_handler::create_scan::<R, A>))
        .route("/reports/{id}", get(scan_handler::get_report::<R, A>))
        .route("/reports", get(scan_handler::list_reports::<R, A>))
        .route("/scans", delete(scan_handler::delete_scans::<R, A>))
        .route("/health", get(health_check))
        .route("/version", get(version))
        .layer(Extension(orchestrator))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "OK" }))
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
