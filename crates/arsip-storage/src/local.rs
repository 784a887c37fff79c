//! Local filesystem tier
//!
//! Probes an ordered list of roots (primary upload root first, then the secondary
//! temp root) for `category/filename`. The first root holding the file wins. Also
//! owns category-directory creation for the sync daemon, which writes through the
//! same layout.

use std::path::{Path, PathBuf};

use arsip_core::{sanitize_filename, FileCategory};
use bytes::Bytes;
use tokio::fs;

use crate::traits::{TierError, TierResult};

#[derive(Clone)]
pub struct LocalTier {
    roots: Vec<PathBuf>,
}

impl LocalTier {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Path of `filename` under `root` for the given category.
    fn path_in(root: &Path, category: FileCategory, filename: &str) -> PathBuf {
        root.join(category.subdir()).join(filename)
    }

    /// Read the first existing copy of `(category, filename)` across the roots,
    /// in order. `Ok(None)` when no root has it.
    pub async fn fetch(
        &self,
        filename: &str,
        category: FileCategory,
    ) -> TierResult<Option<Bytes>> {
        let filename = sanitize_filename(filename);
        if filename.is_empty() {
            return Ok(None);
        }

        for root in &self.roots {
            let path = Self::path_in(root, category, &filename);
            match fs::read(&path).await {
                Ok(data) => {
                    tracing::debug!(path = %path.display(), size_bytes = data.len(), "Local tier hit");
                    return Ok(Some(Bytes::from(data)));
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(TierError::Io(e)),
            }
        }

        Ok(None)
    }

    /// Absolute target path for a sync write under the primary root.
    pub fn sync_target(&self, category: FileCategory, filename: &str) -> TierResult<PathBuf> {
        let filename = sanitize_filename(filename);
        if filename.is_empty() {
            return Err(TierError::Backend("empty filename after sanitization".into()));
        }
        let root = self
            .roots
            .first()
            .ok_or_else(|| TierError::Backend("no local roots configured".into()))?;
        Ok(Self::path_in(root, category, &filename))
    }

    /// Modification time of the local copy under the primary root, if present.
    pub async fn mtime(
        &self,
        category: FileCategory,
        filename: &str,
    ) -> TierResult<Option<std::time::SystemTime>> {
        let path = self.sync_target(category, filename)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(Some(meta.modified()?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TierError::Io(e)),
        }
    }

    /// Create the four category subdirectories under the primary root.
    /// Idempotent; called before every sync cycle's writes.
    pub async fn ensure_category_dirs(&self) -> TierResult<()> {
        let root = self
            .roots
            .first()
            .ok_or_else(|| TierError::Backend("no local roots configured".into()))?;
        for category in FileCategory::ALL {
            fs::create_dir_all(root.join(category.subdir())).await?;
        }
        Ok(())
    }
}

/// Create the category subdirectories under an arbitrary root. Used by the device
/// server at startup, which serves the same layout it was handed.
pub async fn ensure_category_dirs_under(root: &Path) -> TierResult<()> {
    for category in FileCategory::ALL {
        fs::create_dir_all(root.join(category.subdir())).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn two_root_tier(primary: &TempDir, secondary: &TempDir) -> LocalTier {
        LocalTier::new(vec![
            primary.path().to_path_buf(),
            secondary.path().to_path_buf(),
        ])
    }

    #[tokio::test]
    async fn primary_root_wins_over_secondary() {
        let primary = TempDir::new().unwrap();
        let secondary = TempDir::new().unwrap();
        for dir in [&primary, &secondary] {
            std::fs::create_dir_all(dir.path().join("documents")).unwrap();
        }
        std::fs::write(primary.path().join("documents/a.pdf"), b"primary").unwrap();
        std::fs::write(secondary.path().join("documents/a.pdf"), b"secondary").unwrap();

        let tier = two_root_tier(&primary, &secondary);
        let bytes = tier
            .fetch("a.pdf", FileCategory::Documents)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&bytes[..], b"primary");
    }

    #[tokio::test]
    async fn falls_through_to_secondary_root() {
        let primary = TempDir::new().unwrap();
        let secondary = TempDir::new().unwrap();
        std::fs::create_dir_all(secondary.path().join("photos")).unwrap();
        std::fs::write(secondary.path().join("photos/ktp.jpg"), b"jpg").unwrap();

        let tier = two_root_tier(&primary, &secondary);
        let bytes = tier
            .fetch("ktp.jpg", FileCategory::Photos)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&bytes[..], b"jpg");
    }

    #[tokio::test]
    async fn absent_everywhere_is_none() {
        let primary = TempDir::new().unwrap();
        let secondary = TempDir::new().unwrap();
        let tier = two_root_tier(&primary, &secondary);
        assert!(tier
            .fetch("missing.pdf", FileCategory::Payments)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn traversal_filename_is_confined_to_category() {
        let primary = TempDir::new().unwrap();
        let secondary = TempDir::new().unwrap();
        std::fs::write(primary.path().join("secret.txt"), b"secret").unwrap();

        let tier = two_root_tier(&primary, &secondary);
        // Reduces to basename "secret.txt", which does not exist under documents/.
        let got = tier
            .fetch("../secret.txt", FileCategory::Documents)
            .await
            .unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn ensure_category_dirs_is_idempotent() {
        let primary = TempDir::new().unwrap();
        let tier = LocalTier::new(vec![primary.path().to_path_buf()]);
        tier.ensure_category_dirs().await.unwrap();
        tier.ensure_category_dirs().await.unwrap();
        for category in FileCategory::ALL {
            assert!(primary.path().join(category.subdir()).is_dir());
        }
    }
}
