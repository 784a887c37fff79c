//! File resolution route: `GET /files?file=<name>&type=<category>`.
//!
//! Success streams the bytes with `Content-Type`/`Content-Length`/
//! `Content-Disposition` and, for non-database tiers, `X-Served-From`. A miss of
//! every tier renders a diagnostic 404: when the metadata catalog knows the file,
//! the body carries its original name, upload time, and operator remediation
//! suggestions; otherwise it is a bare 404.

use std::sync::Arc;

use arsip_core::{AppError, FileCategory};
use arsip_services::{Resolution, ServedFile, NOT_FOUND_SUGGESTIONS};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HttpAppError;
use crate::state::AppState;

static X_SERVED_FROM: HeaderName = HeaderName::from_static("x-served-from");

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub file: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<String>,
}

/// Diagnostic body for the terminal 404.
#[derive(Debug, Serialize)]
pub struct NotFoundBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<&'static str>>,
}

#[tracing::instrument(skip(state, query), fields(operation = "get_file"))]
pub async fn get_file(
    Query(query): Query<FileQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    let file = query
        .file
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing file parameter".to_string()))?;
    let category: FileCategory = query
        .category
        .as_deref()
        .ok_or_else(|| AppError::InvalidInput("Missing type parameter".to_string()))?
        .parse()?;

    match state.resolver.resolve(file, category).await? {
        Resolution::Served(served) => serve_bytes(served),
        Resolution::NotFound { filename, metadata } => {
            let body = match metadata {
                Some(meta) => NotFoundBody {
                    error: "File not found".to_string(),
                    message: Some(
                        "The file was uploaded but is not available from any storage tier"
                            .to_string(),
                    ),
                    filename,
                    original_name: Some(meta.original_name),
                    upload_time: Some(meta.uploaded_at),
                    suggestions: Some(NOT_FOUND_SUGGESTIONS.to_vec()),
                },
                None => NotFoundBody {
                    error: "File not found".to_string(),
                    message: None,
                    filename,
                    original_name: None,
                    upload_time: None,
                    suggestions: None,
                },
            };
            Ok((StatusCode::NOT_FOUND, Json(body)).into_response())
        }
    }
}

fn serve_bytes(served: ServedFile) -> Result<Response, HttpAppError> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, served.content_type.as_str())
        .header(header::CONTENT_LENGTH, served.bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", served.disposition_name),
        );

    if let Some(tier) = served.tier.header_value() {
        builder = builder.header(X_SERVED_FROM.clone(), tier);
    }

    builder
        .body(Body::from(served.bytes))
        .map_err(|e| HttpAppError(AppError::Internal(e.to_string())))
}
