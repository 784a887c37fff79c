//! File lookup with the listing containment check
//!
//! The security invariant: the canonicalized candidate must sit directly inside
//! the canonicalized category folder, and its name must appear in a directory
//! listing taken at request time (hidden entries excluded). A candidate that
//! resolves elsewhere, for example through a symlink, or that exists but is not
//! listed, is a containment violation (403), distinct from plain absence (404).

use std::path::{Path, PathBuf};

use arsip_core::{sanitize_filename, AppError, FileCategory};
use tokio::fs;

/// A file cleared for serving: its canonical path and resolved name.
#[derive(Debug)]
pub struct ServableFile {
    pub path: PathBuf,
    pub filename: String,
}

/// Resolve `(filename, category)` under `root`, enforcing containment.
pub async fn locate(
    root: &Path,
    filename: &str,
    category: FileCategory,
) -> Result<ServableFile, AppError> {
    let filename = sanitize_filename(filename);
    if filename.is_empty() {
        return Err(AppError::InvalidInput("Missing file parameter".to_string()));
    }

    let category_dir = root.join(category.subdir());
    let candidate = category_dir.join(&filename);

    let canonical = match fs::canonicalize(&candidate).await {
        Ok(p) => p,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("File not found: {}", filename)));
        }
        Err(e) => return Err(AppError::Io(e)),
    };

    let canonical_dir = fs::canonicalize(&category_dir).await?;
    let in_listing = listing_contains(&canonical_dir, &filename).await?;
    if canonical.parent() != Some(canonical_dir.as_path()) || !in_listing {
        tracing::warn!(
            requested = %filename,
            category = %category,
            resolved = %canonical.display(),
            "Containment violation: resolved path escapes category listing"
        );
        return Err(AppError::Unauthorized(format!(
            "Access to {} is not permitted",
            filename
        )));
    }

    Ok(ServableFile {
        path: canonical,
        filename,
    })
}

/// Whether `filename` appears in a fresh listing of `dir`. Hidden entries are
/// not part of the listing and therefore not servable.
async fn listing_contains(dir: &Path, filename: &str) -> Result<bool, AppError> {
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        if name == filename {
            return Ok(true);
        }
    }
    Ok(false)
}
