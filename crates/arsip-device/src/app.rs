//! Router and handlers for the device server
//!
//! `GET /?file=<name>&type=<category>` serves raw bytes with a sniffed
//! `Content-Type`. Cross-origin access is limited to GET/OPTIONS; the router
//! registers no other verbs, so anything else is rejected outright.

use std::path::PathBuf;
use std::sync::Arc;

use arsip_core::{mime, AppError, DeviceConfig, FileCategory};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::serve;

pub struct DeviceState {
    pub storage_root: PathBuf,
    pub device_name: String,
}

#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    pub file: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeviceError {
    error: String,
    code: String,
}

struct HttpError(AppError);

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        HttpError(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = DeviceError {
            error: err.to_string(),
            code: err.error_code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn build_router(config: DeviceConfig) -> Router {
    let state = Arc::new(DeviceState {
        storage_root: config.storage_root,
        device_name: config.device_name,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(fetch_file))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<Arc<DeviceState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "device_name": state.device_name }))
}

#[tracing::instrument(skip(state, query), fields(operation = "device_fetch"))]
async fn fetch_file(
    Query(query): Query<FetchQuery>,
    State(state): State<Arc<DeviceState>>,
) -> Result<Response, HttpError> {
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

    let found = serve::locate(&state.storage_root, file, category).await?;
    let data = tokio::fs::read(&found.path).await.map_err(AppError::Io)?;

    let head_len = data.len().min(16);
    let content_type = mime::sniff(&data[..head_len], &found.filename);

    tracing::debug!(
        filename = %found.filename,
        %category,
        size_bytes = data.len(),
        content_type,
        "Serving device file"
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, data.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", found.filename),
        )
        .body(Body::from(data))
        .map_err(|e| HttpError(AppError::Internal(e.to_string())))
}
