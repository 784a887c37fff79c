//! HTTP error response conversion
//!
//! Wraps `AppError` so handlers can return `Result<Response, HttpAppError>` and
//! have every failure render consistently (status, JSON body, logging). The
//! wrapper exists because of orphan rules: `IntoResponse` cannot be implemented
//! for `AppError` outside this crate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use arsip_core::AppError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match status {
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                tracing::debug!(error = %err, "Request failed")
            }
            StatusCode::FORBIDDEN => tracing::warn!(error = %err, "Request forbidden"),
            _ => tracing::error!(error = %err, "Request failed"),
        }

        let body = ErrorResponse {
            error: err.to_string(),
            code: err.error_code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
