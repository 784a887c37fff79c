//! Domain models

pub mod device;
pub mod file;
pub mod sync;

pub use device::{DeviceRegistration, LIVENESS_WINDOW};
pub use file::{FileMetadataEntry, FileRecord};
pub use sync::SyncManifestEntry;
