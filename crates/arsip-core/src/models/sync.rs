//! Sync manifest model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::FileCategory;

/// One entry of an origin's `?action=list` manifest. Transient: consumed once per
/// sync cycle, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncManifestEntry {
    pub filename: String,
    pub directory: FileCategory,
    pub upload_time: DateTime<Utc>,
}
