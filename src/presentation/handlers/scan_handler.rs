// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::{
    application::{
        dto::{
            scan_request::{DeleteScansRequestDto, ListReportsQuery, ScanRequestDto},
            scan_response::{DeleteScansResponseDto, FailedDeleteDto, ScanResponseDto},
        },
        use_cases::scan_use_case::{ScanOrchestrator, ScanUseCaseError},
    },
    domain::repositories::scan_repository::ScanRepository,
    presentation::errors::AppError,
    scanner::traits::AuditRunner,
};

/// 创建新的扫描任务
pub async fn create_scan<R, A>(
    Extension(orchestrator): Extension<Arc<ScanOrchestrator<R, A>>>,
    Json(payload): Json<ScanRequestDto>,
) -> impl IntoResponse
where
    R: ScanRepository + 'static,
    A: AuditRunner + 'static,
{
    if let Err(errors) = payload.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Validation error: {}", errors) })),
        )
            .into_response();
    }

    match orchestrator.submit(&payload.url).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ScanResponseDto {
                id: record.id,
                url: record.url,
                status: record.status,
            }),
        )
            .into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

/// 获取单个扫描报告
pub async fn get_report<R, A>(
    Extension(orchestrator): Extension<Arc<ScanOrchestrator<R, A>>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse
where
    R: ScanRepository + 'static,
    A: AuditRunner + 'static,
{
    match orchestrator.get_by_id(id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

/// 获取最近的扫描报告列表，按创建时间倒序
pub async fn list_reports<R, A>(
    Extension(orchestrator): Extension<Arc<ScanOrchestrator<R, A>>>,
    Query(params): Query<ListReportsQuery>,
) -> Result<impl IntoResponse, AppError>
where
    R: ScanRepository + 'static,
    A: AuditRunner + 'static,
{
    let limit = params.limit.unwrap_or(10).min(100);
    let records = orchestrator.list_recent(limit).await?;
    Ok(Json(records))
}

/// 批量删除扫描记录
///
/// 部分失败会逐条上报，而不是折叠成整体成功
pub async fn delete_scans<R, A>(
    Extension(orchestrator): Extension<Arc<ScanOrchestrator<R, A>>>,
    Json(payload): Json<DeleteScansRequestDto>,
) -> Result<Json<DeleteScansResponseDto>, AppError>
where
    R: ScanRepository + 'static,
    A: AuditRunner + 'static,
{
    if let Err(errors) = payload.validate() {
        return Err(AppError::from(anyhow::anyhow!(
            "Validation error: {}",
            errors
        )));
    }

    let (deleted, failed) = orchestrator.delete_many(payload.ids).await?;

    if !failed.is_empty() {
        warn!("Bulk delete completed with {} failures", failed.len());
    }

    let failed: Vec<FailedDeleteDto> = failed
        .into_iter()
        .map(|(id, reason)| FailedDeleteDto { id, reason })
        .collect();
    let total_deleted = deleted.len() as u64;
    let total_failed = failed.len() as u64;

    Ok(Json(DeleteScansResponseDto {
        deleted,
        failed,
        total_deleted,
        total_failed,
    }))
}

impl From<ScanUseCaseError> for (StatusCode, String) {
    fn from(err: ScanUseCaseError) -> Self {
        match err {
            ScanUseCaseError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ScanUseCaseError::NotFound => (StatusCode::NOT_FOUND, "Scan not found".to_string()),
            ScanUseCaseError::Domain(e) => (StatusCode::CONFLICT, e.to_string()),
            ScanUseCaseError::Repository(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}
