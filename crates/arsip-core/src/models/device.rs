//! Admin device registration model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Heartbeats older than this exclude a device from resolution.
pub const LIVENESS_WINDOW: Duration = Duration::minutes(10);

/// A row in `admin_devices`: one operator-hosted machine, keyed by `admin_id`
/// (one row per admin, maintained by upsert).
///
/// `is_active` is operator-managed only; resolution failures never flip it. A
/// stale heartbeat makes the device invisible to `list_live_devices` without
/// deleting or deactivating the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DeviceRegistration {
    pub admin_id: i64,
    pub device_url: String,
    pub device_name: String,
    pub is_active: bool,
    pub last_ping: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl DeviceRegistration {
    /// Liveness predicate: active and heartbeated within [`LIVENESS_WINDOW`].
    /// Computed per query against the caller's `now`; never cached.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now - self.last_ping <= LIVENESS_WINDOW
    }
}
