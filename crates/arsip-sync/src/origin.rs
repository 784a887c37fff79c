//! Origin endpoints
//!
//! The origin exposes two query-driven operations: `?action=list` returning the
//! manifest as a JSON array, and `?action=download&file=&type=` returning raw
//! bytes. The trait seam lets the engine run against an in-memory origin in
//! tests.

use arsip_core::{AppError, FileCategory, SyncManifestEntry};
use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait Origin: Send + Sync {
    /// Current file set of the origin. Consumed once per cycle.
    async fn fetch_manifest(&self) -> Result<Vec<SyncManifestEntry>, AppError>;

    /// Whole-file download of one manifest entry.
    async fn download(&self, filename: &str, category: FileCategory) -> Result<Bytes, AppError>;
}

pub struct HttpOrigin {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrigin {
    pub fn new(base_url: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl Origin for HttpOrigin {
    async fn fetch_manifest(&self) -> Result<Vec<SyncManifestEntry>, AppError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("action", "list")])
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Manifest fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Manifest fetch returned status {}",
                response.status()
            )));
        }

        response
            .json::<Vec<SyncManifestEntry>>()
            .await
            .map_err(|e| AppError::Internal(format!("Manifest parse failed: {e}")))
    }

    async fn download(&self, filename: &str, category: FileCategory) -> Result<Bytes, AppError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("action", "download"),
                ("file", filename),
                ("type", category.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Download failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Download of {} returned status {}",
                filename,
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| AppError::Internal(format!("Download body failed: {e}")))
    }
}
