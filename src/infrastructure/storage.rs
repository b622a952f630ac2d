use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::domain::error::{AppError, Result};
use crate::domain::upload::UploadStore;

pub fn ensure_dir(path: &Path) -> std::io::Result<PathBuf> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}

/// Flat directory on local disk. Writes go through a temp file and a rename so
/// readers never observe a partially written upload.
pub struct LocalDirStore {
    root: PathBuf,
}

impl LocalDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_path(&self, filename: &str) -> Result<PathBuf> {
        if filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(AppError::ValidationError(format!(
                "Invalid stored filename: {:?}",
                filename
            )));
        }
        Ok(self.root.join(filename))
    }
}

#[async_trait]
impl UploadStore for LocalDirStore {
    async fn save(&self, filename: &str, content: &[u8]) -> Result<PathBuf> {
        let target = self.entry_path(filename)?;
        let tmp = self
            .root
            .join(format!(".{}.{}.part", filename, Uuid::new_v4().simple()));

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::IoError(format!(
                "Failed to create upload dir {}: {e}",
                self.root.display()
            ))
        })?;

        if let Err(e) = tokio::fs::write(&tmp, content).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::IoError(format!(
                "Failed to write {}: {e}",
                tmp.display()
            )));
        }

        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::IoError(format!(
                "Failed to rename {} to {}: {e}",
                tmp.display(),
                target.display()
            )));
        }

        Ok(target)
    }

    async fn read(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.entry_path(filename)?;
        Ok(tokio::fs::read(&path).await?)
    }
}
