use std::sync::Arc;

use arsip_core::SyncConfig;
use arsip_storage::LocalTier;
use arsip_sync::{HttpOrigin, SyncEngine};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = SyncConfig::from_env()?;
    let origin = HttpOrigin::new(config.origin_url.clone())
        .map_err(|e| anyhow::anyhow!("Origin client setup failed: {e}"))?;
    let engine = SyncEngine::new(Arc::new(origin), LocalTier::new(vec![config.local_root]));

    // Single optional argument: `daemon` selects continuous mode.
    let daemon = std::env::args().nth(1).as_deref() == Some("daemon");

    if daemon {
        let token = CancellationToken::new();
        let signal_token = token.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            signal_token.cancel();
        });
        tracing::info!(origin = %config.origin_url, "Sync daemon started");
        engine.run(token).await;
    } else {
        let report = engine
            .sync_once()
            .await
            .map_err(|e| anyhow::anyhow!("Sync failed: {e}"))?;
        tracing::info!(
            downloaded = report.downloaded,
            skipped = report.skipped,
            failed = report.failed,
            "One-shot sync finished"
        );
    }

    Ok(())
}

/// Resolves when Ctrl+C (SIGINT) or SIGTERM arrives.
///
/// # Panics
/// Panics if a signal handler cannot be installed (unrecoverable system error).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
