//! Repository modules

pub mod devices;
pub mod file_records;
pub mod metadata;
