//! Arsip core library
//!
//! Shared domain types for the tiered file-serving subsystem: the closed upload
//! category enum, file/device/metadata models, filename sanitization, MIME helpers,
//! the unified `AppError`, and env-driven configuration.
//!
//! The `sqlx` feature gates the database error variant and `FromRow` derives; with
//! `default-features = false` this crate is usable from binaries that never touch
//! Postgres (the device server and the sync daemon).

pub mod category;
pub mod config;
pub mod error;
pub mod mime;
pub mod models;
pub mod sanitize;

pub use category::FileCategory;
pub use config::{ApiConfig, DeviceConfig, SyncConfig};
pub use error::{AppError, AppResult};
pub use models::{DeviceRegistration, FileMetadataEntry, FileRecord, SyncManifestEntry};
pub use sanitize::sanitize_filename;
