use arsip_api::{routes, server, state::AppState};
use arsip_core::ApiConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ApiConfig::from_env()?;

    let pool = arsip_db::connect(&config.database_url, config.db_max_connections).await?;
    let port = config.server_port;
    let state = AppState::new(config, pool)?;
    let app = routes::build_router(state);

    server::start_server(port, app).await
}
