//! Sync engine
//!
//! One cycle: fetch the manifest, ensure the category directories, then pull
//! every entry whose local copy is missing or strictly older than its declared
//! upload time. A manifest failure abandons the whole cycle before anything is
//! written; a single entry's download failure is logged and skipped. There is no
//! backoff: the next scheduled cycle simply starts fresh.

use std::sync::Arc;
use std::time::SystemTime;

use arsip_core::config::SYNC_INTERVAL;
use arsip_core::{AppError, SyncManifestEntry};
use arsip_storage::LocalTier;
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio_util::sync::CancellationToken;

use crate::origin::Origin;

/// Pull decision for one manifest entry: download when the local copy is
/// missing, or when its mtime is strictly older than the declared upload time.
/// A local copy at least as new as the manifest entry is left alone.
pub fn needs_download(local_mtime: Option<SystemTime>, upload_time: DateTime<Utc>) -> bool {
    match local_mtime {
        None => true,
        Some(mtime) => DateTime::<Utc>::from(mtime) < upload_time,
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct SyncEngine {
    origin: Arc<dyn Origin>,
    local: LocalTier,
}

impl SyncEngine {
    pub fn new(origin: Arc<dyn Origin>, local: LocalTier) -> Self {
        Self { origin, local }
    }

    /// One full pass over the origin manifest.
    #[tracing::instrument(skip(self), fields(operation = "sync_once"))]
    pub async fn sync_once(&self) -> Result<SyncReport, AppError> {
        let manifest = self.origin.fetch_manifest().await?;
        tracing::info!(entries = manifest.len(), "Fetched origin manifest");

        self.local
            .ensure_category_dirs()
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let mut report = SyncReport::default();
        for entry in &manifest {
            match self.sync_entry(entry).await {
                Ok(true) => report.downloaded += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        filename = %entry.filename,
                        category = %entry.directory,
                        error = %e,
                        "Entry sync failed, skipping"
                    );
                }
            }
        }

        tracing::info!(
            downloaded = report.downloaded,
            skipped = report.skipped,
            failed = report.failed,
            "Sync pass complete"
        );
        Ok(report)
    }

    /// Pull one entry if needed. Returns whether a download happened.
    async fn sync_entry(&self, entry: &SyncManifestEntry) -> Result<bool, AppError> {
        let mtime = self
            .local
            .mtime(entry.directory, &entry.filename)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if !needs_download(mtime, entry.upload_time) {
            return Ok(false);
        }

        let bytes = self.origin.download(&entry.filename, entry.directory).await?;
        let target = self
            .local
            .sync_target(entry.directory, &entry.filename)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        // Whole-file replace through a temp file so a torn download never
        // clobbers a good local copy.
        let tmp = target.with_extension("part");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &target).await?;

        tracing::debug!(
            filename = %entry.filename,
            category = %entry.directory,
            size_bytes = bytes.len(),
            "Pulled file from origin"
        );
        Ok(true)
    }

    /// Continuous mode: a pass, then a five-minute pause, until cancelled. A
    /// failed pass is logged and the cycle is skipped; the next one starts
    /// fresh.
    pub async fn run(&self, token: CancellationToken) {
        loop {
            if let Err(e) = self.sync_once().await {
                tracing::error!(error = %e, "Sync cycle abandoned");
            }
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Sync daemon stopping");
                    break;
                }
                _ = tokio::time::sleep(SYNC_INTERVAL) => {}
            }
        }
    }
}
