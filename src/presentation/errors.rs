// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::use_cases::scan_use_case::ScanUseCaseError;
use crate::domain::repositories::scan_repository::RepositoryError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = if let Some(e) = self.0.downcast_ref::<ScanUseCaseError>() {
            match e {
                ScanUseCaseError::Validation(_) => StatusCode::BAD_REQUEST,
                ScanUseCaseError::NotFound => StatusCode::NOT_FOUND,
                ScanUseCaseError::Domain(_) => StatusCode::CONFLICT,
                ScanUseCaseError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if let Some(RepositoryError::NotFound) = self.0.downcast_ref::<RepositoryError>() {
            StatusCode::NOT_FOUND
        } else if error_message.contains("cannot be empty")
            || error_message.contains("invalid")
            || error_message.contains("validation")
        {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
