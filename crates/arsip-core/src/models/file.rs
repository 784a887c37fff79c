//! Uploaded file models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::FileCategory;

/// A row in `file_records`: uploaded bytes plus metadata.
///
/// `file_data` is nullable by design: rows written without content act purely as
/// catalog placeholders and never satisfy a read. Records are immutable once
/// created and are never deleted by this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct FileRecord {
    pub filename: String,
    pub directory: FileCategory,
    pub original_name: String,
    pub file_data: Option<Vec<u8>>,
    pub mime_type: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl FileRecord {
    /// Whether this record can actually serve bytes. Placeholder rows with NULL
    /// content answer false and behave like a miss at the database tier.
    pub fn is_servable(&self) -> bool {
        self.file_data.is_some()
    }
}

/// A row in `file_metadata`: the independent catalog consulted only when every
/// tier has missed, so the terminal 404 can describe the file it failed to find.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct FileMetadataEntry {
    pub filename: String,
    pub directory: FileCategory,
    pub original_name: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}
