//! Configuration module
//!
//! Env-driven configuration for the three binaries. Each binary loads `.env` via
//! `dotenvy` (best effort) and builds its own struct; components receive what they
//! need through constructors, never from ambient globals.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_PORT: u16 = 4000;
const DEFAULT_DEVICE_PORT: u16 = 8088;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Per-attempt timeout for outbound device fetches during resolution.
pub const DEVICE_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixed pause between continuous sync passes.
pub const SYNC_INTERVAL: Duration = Duration::from_secs(5 * 60);

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Configuration for the resolver API binary.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub cors_origins: Vec<String>,
    /// Ordered local-tier roots: primary upload root first, then the temp root.
    pub local_roots: Vec<PathBuf>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable not set"))?;

        let cors_origins = env_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let primary = PathBuf::from(env_or("UPLOAD_ROOT", "/var/lib/arsip/uploads"));
        let secondary = PathBuf::from(env_or("FALLBACK_ROOT", "/tmp/arsip/uploads"));

        Ok(Self {
            server_port: env_parse_or("PORT", DEFAULT_API_PORT),
            database_url,
            db_max_connections: env_parse_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            cors_origins,
            local_roots: vec![primary, secondary],
        })
    }
}

/// Configuration for the operator-hosted device server binary.
#[derive(Clone, Debug)]
pub struct DeviceConfig {
    pub server_port: u16,
    /// Root under which the four category subdirectories live.
    pub storage_root: PathBuf,
    pub device_name: String,
}

impl DeviceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server_port: env_parse_or("PORT", DEFAULT_DEVICE_PORT),
            storage_root: PathBuf::from(env_or("DEVICE_STORAGE_ROOT", "./arsip-files")),
            device_name: env_or("DEVICE_NAME", "unnamed-device"),
        })
    }
}

/// Configuration for the sync daemon binary.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Origin base URL exposing `?action=list` and `?action=download`.
    pub origin_url: String,
    /// Local root the mirror is written under.
    pub local_root: PathBuf,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let origin_url = env::var("SYNC_ORIGIN_URL")
            .map_err(|_| anyhow::anyhow!("SYNC_ORIGIN_URL environment variable not set"))?;

        Ok(Self {
            origin_url,
            local_root: PathBuf::from(env_or("UPLOAD_ROOT", "/var/lib/arsip/uploads")),
        })
    }
}
