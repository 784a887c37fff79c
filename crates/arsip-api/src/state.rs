//! Shared application state

use std::sync::Arc;

use arsip_core::ApiConfig;
use arsip_db::{DeviceRegistry, FileMetadataRepository, FileRecordRepository, PgPool};
use arsip_services::FileResolver;
use arsip_storage::{DeviceClient, LocalTier, TierError};

pub struct AppState {
    pub config: ApiConfig,
    pub resolver: FileResolver,
}

impl AppState {
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Arc<Self>, TierError> {
        let records = FileRecordRepository::new(pool.clone());
        let devices = DeviceRegistry::new(pool.clone());
        let metadata = FileMetadataRepository::new(pool);
        let local = LocalTier::new(config.local_roots.clone());
        let device_client = DeviceClient::new()?;

        let resolver = FileResolver::new(
            Arc::new(records),
            Arc::new(devices),
            Arc::new(device_client),
            Arc::new(local),
            Arc::new(metadata),
        );

        Ok(Arc::new(Self { config, resolver }))
    }
}
