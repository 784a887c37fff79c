//! Arsip services
//!
//! The resolution orchestrator. [`resolver::FileResolver`] walks the tier chain
//! (database record store, live admin devices, local disk) for each read and
//! terminates in either a served file or a diagnostic miss. The tiers sit behind
//! trait seams so the orchestrator is testable without Postgres or a network.

pub mod resolver;
pub mod tiers;

pub use resolver::{FileResolver, Resolution, ServeTier, ServedFile, NOT_FOUND_SUGGESTIONS};
pub use tiers::{DeviceDirectory, DeviceFetch, LocalSource, MetadataSource, RecordSource};
