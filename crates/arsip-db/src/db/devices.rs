//! Admin device registry
//!
//! Tracks which operator-hosted machines are reachable. Liveness is recomputed on
//! every call: rows are fetched active-first ordered by heartbeat recency and the
//! 10-minute window is applied in Rust via [`DeviceRegistration::is_live`], so the
//! predicate has a single testable definition. Stale rows stay in the table;
//! `is_active` is operator-managed and never flipped by resolution traffic.

use arsip_core::models::DeviceRegistration;
use arsip_core::AppError;
use chrono::Utc;
use sqlx::{PgPool, Postgres};

#[derive(Clone)]
pub struct DeviceRegistry {
    pool: PgPool,
}

impl DeviceRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Devices currently eligible for the device tier, most recently heartbeated
    /// first. No caching; every resolution sees the registry as of its own query.
    #[tracing::instrument(skip(self), fields(db.table = "admin_devices", db.operation = "select"))]
    pub async fn list_live_devices(&self) -> Result<Vec<DeviceRegistration>, AppError> {
        let rows: Vec<DeviceRegistration> = sqlx::query_as::<Postgres, DeviceRegistration>(
            r#"
            SELECT admin_id, device_url, device_name, is_active, last_ping, created_at
            FROM admin_devices
            WHERE is_active = TRUE
            ORDER BY last_ping DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let now = Utc::now();
        Ok(rows.into_iter().filter(|d| d.is_live(now)).collect())
    }

    /// Idempotent upsert keyed on `admin_id`: one row per admin. Re-registering
    /// refreshes the URL, name, and heartbeat, and reactivates the device.
    #[tracing::instrument(skip(self), fields(db.table = "admin_devices", db.operation = "upsert"))]
    pub async fn register_or_update(
        &self,
        admin_id: i64,
        device_url: &str,
        device_name: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO admin_devices (admin_id, device_url, device_name, is_active, last_ping)
            VALUES ($1, $2, $3, TRUE, now())
            ON CONFLICT (admin_id) DO UPDATE SET
                device_url = EXCLUDED.device_url,
                device_name = EXCLUDED.device_name,
                is_active = TRUE,
                last_ping = now()
            "#,
        )
        .bind(admin_id)
        .bind(device_url)
        .bind(device_name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Refresh the heartbeat for an already-registered device. A no-op for
    /// unknown admins; registration is explicit.
    #[tracing::instrument(skip(self), fields(db.table = "admin_devices", db.operation = "update"))]
    pub async fn heartbeat(&self, admin_id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE admin_devices SET last_ping = now() WHERE admin_id = $1")
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
