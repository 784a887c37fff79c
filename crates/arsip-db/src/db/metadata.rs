//! File metadata catalog
//!
//! Consulted only after every tier has missed, so the terminal 404 can say what it
//! failed to find. An entry here is independent of the record store and may
//! describe a file whose bytes exist nowhere (a self-describing miss).

use arsip_core::{sanitize_filename, AppError, FileCategory, FileMetadataEntry};
use sqlx::{PgPool, Postgres};

#[derive(Clone)]
pub struct FileMetadataRepository {
    pool: PgPool,
}

impl FileMetadataRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "file_metadata", db.operation = "select"))]
    pub async fn get_by_key(
        &self,
        filename: &str,
        directory: FileCategory,
    ) -> Result<Option<FileMetadataEntry>, AppError> {
        let filename = sanitize_filename(filename);
        if filename.is_empty() {
            return Ok(None);
        }

        let row = sqlx::query_as::<Postgres, FileMetadataEntry>(
            r#"
            SELECT filename, directory, original_name, file_size, uploaded_at
            FROM file_metadata
            WHERE filename = $1 AND directory = $2
            "#,
        )
        .bind(&filename)
        .bind(directory)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
