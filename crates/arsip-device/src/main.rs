use arsip_core::DeviceConfig;
use arsip_storage::local::ensure_category_dirs_under;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = DeviceConfig::from_env()?;
    ensure_category_dirs_under(&config.storage_root)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare storage root: {e}"))?;

    let addr = format!("0.0.0.0:{}", config.server_port);
    tracing::info!(
        addr = %addr,
        storage_root = %config.storage_root.display(),
        device_name = %config.device_name,
        "Starting device server"
    );

    let app = arsip_device::app::build_router(config);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
