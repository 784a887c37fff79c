//! File record repository
//!
//! Primary (database) tier of the resolution chain. A lookup answers `None` both
//! when no row exists and when the row's `file_data` is NULL; callers cannot
//! distinguish the two, since both mean "not servable from this tier".

use arsip_core::{sanitize_filename, AppError, FileCategory, FileRecord};
use sqlx::{PgPool, Postgres};

#[derive(Clone)]
pub struct FileRecordRepository {
    pool: PgPool,
}

impl FileRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a servable record by `(filename, directory)`. The filename is
    /// reduced to its final path segment before the lookup.
    #[tracing::instrument(skip(self), fields(db.table = "file_records", db.operation = "select"))]
    pub async fn get_by_key(
        &self,
        filename: &str,
        directory: FileCategory,
    ) -> Result<Option<FileRecord>, AppError> {
        let filename = sanitize_filename(filename);
        if filename.is_empty() {
            return Ok(None);
        }

        let row: Option<FileRecord> = sqlx::query_as::<Postgres, FileRecord>(
            r#"
            SELECT filename, directory, original_name, file_data, mime_type, file_size, uploaded_at
            FROM file_records
            WHERE filename = $1 AND directory = $2
            "#,
        )
        .bind(&filename)
        .bind(directory)
        .fetch_optional(&self.pool)
        .await?;

        // NULL-content rows are catalog placeholders; treat them as a miss.
        Ok(row.filter(|r| r.is_servable()))
    }

    /// Insert a record. Upload handling lives outside the resolution core; this
    /// exists so the schema has a writer and tests can seed it.
    #[tracing::instrument(
        skip(self, record),
        fields(db.table = "file_records", db.operation = "insert")
    )]
    pub async fn insert(&self, record: &FileRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO file_records
                (filename, directory, original_name, file_data, mime_type, file_size, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&record.filename)
        .bind(record.directory)
        .bind(&record.original_name)
        .bind(&record.file_data)
        .bind(&record.mime_type)
        .bind(record.file_size)
        .bind(record.uploaded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
