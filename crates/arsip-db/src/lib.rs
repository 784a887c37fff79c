//! Arsip database layer
//!
//! Postgres repositories over a shared [`sqlx::PgPool`]: file records, the admin
//! device registry, and the diagnostics metadata catalog. All state coordination
//! in the subsystem lives in these tables; the repositories add no in-process
//! caching or locking.

pub mod db;

pub use db::devices::DeviceRegistry;
pub use db::file_records::FileRecordRepository;
pub use db::metadata::FileMetadataRepository;

use sqlx::postgres::PgPoolOptions;
pub use sqlx::PgPool;

/// Connect a pool and run the embedded migrations.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
