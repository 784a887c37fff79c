//! Tier seams
//!
//! Trait per tier dependency of the resolver, with implementations for the
//! concrete repository/client types. The resolver only sees these traits, so
//! tests can substitute in-memory fakes for each tier independently.

use arsip_core::models::DeviceRegistration;
use arsip_core::{AppError, FileCategory, FileMetadataEntry, FileRecord};
use arsip_storage::{DeviceClient, LocalTier, TierResult};
use async_trait::async_trait;
use bytes::Bytes;

/// Primary tier: the database-backed record store.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn get_by_key(
        &self,
        filename: &str,
        directory: FileCategory,
    ) -> Result<Option<FileRecord>, AppError>;
}

/// Registry of currently-live devices, most recently heartbeated first.
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    async fn list_live_devices(&self) -> Result<Vec<DeviceRegistration>, AppError>;
}

/// One fetch attempt against one device server.
#[async_trait]
pub trait DeviceFetch: Send + Sync {
    async fn fetch(
        &self,
        device_url: &str,
        filename: &str,
        category: FileCategory,
    ) -> TierResult<Bytes>;
}

/// Local-disk tier over the ordered root list.
#[async_trait]
pub trait LocalSource: Send + Sync {
    async fn fetch(&self, filename: &str, category: FileCategory) -> TierResult<Option<Bytes>>;
}

/// Diagnostics catalog consulted only for the terminal miss.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn get_by_key(
        &self,
        filename: &str,
        directory: FileCategory,
    ) -> Result<Option<FileMetadataEntry>, AppError>;
}

#[async_trait]
impl RecordSource for arsip_db::FileRecordRepository {
    async fn get_by_key(
        &self,
        filename: &str,
        directory: FileCategory,
    ) -> Result<Option<FileRecord>, AppError> {
        arsip_db::FileRecordRepository::get_by_key(self, filename, directory).await
    }
}

#[async_trait]
impl DeviceDirectory for arsip_db::DeviceRegistry {
    async fn list_live_devices(&self) -> Result<Vec<DeviceRegistration>, AppError> {
        arsip_db::DeviceRegistry::list_live_devices(self).await
    }
}

#[async_trait]
impl DeviceFetch for DeviceClient {
    async fn fetch(
        &self,
        device_url: &str,
        filename: &str,
        category: FileCategory,
    ) -> TierResult<Bytes> {
        DeviceClient::fetch(self, device_url, filename, category).await
    }
}

#[async_trait]
impl LocalSource for LocalTier {
    async fn fetch(&self, filename: &str, category: FileCategory) -> TierResult<Option<Bytes>> {
        LocalTier::fetch(self, filename, category).await
    }
}

#[async_trait]
impl MetadataSource for arsip_db::FileMetadataRepository {
    async fn get_by_key(
        &self,
        filename: &str,
        directory: FileCategory,
    ) -> Result<Option<FileMetadataEntry>, AppError> {
        arsip_db::FileMetadataRepository::get_by_key(self, filename, directory).await
    }
}
