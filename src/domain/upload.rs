use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::error::Result;

/// Name of the multipart part that carries the uploaded file.
pub const FILE_FIELD: &str = "file";

/// One file part as received from the upload form.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub field_name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

impl UploadRequest {
    /// The submitted filename, or `None` when the browser sent an empty one.
    /// Whitespace-only names count as present and are left to the allow-list.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref().filter(|name| !name.is_empty())
    }
}

/// Receipt for a file written to the upload directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUpload {
    pub original_filename: String,
    pub stored_filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub sha256: String,
    pub content_type: Option<String>,
    pub received_at: DateTime<Utc>,
}

/// Flat directory of named blobs.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Writes `content` under `filename`, replacing any existing file.
    async fn save(&self, filename: &str, content: &[u8]) -> Result<PathBuf>;

    async fn read(&self, filename: &str) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(filename: Option<&str>) -> UploadRequest {
        UploadRequest {
            field_name: FILE_FIELD.to_string(),
            filename: filename.map(str::to_string),
            content_type: None,
            content: Vec::new(),
        }
    }

    #[test]
    fn empty_filename_is_treated_as_missing() {
        assert_eq!(request(Some("")).filename(), None);
        assert_eq!(request(None).filename(), None);
    }

    #[test]
    fn whitespace_filename_is_kept_as_sent() {
        assert_eq!(request(Some("   ")).filename(), Some("   "));
        assert_eq!(request(Some(" sales.csv ")).filename(), Some(" sales.csv "));
    }
}
