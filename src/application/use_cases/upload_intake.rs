use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::application::use_cases::filename::{has_allowed_extension, storage_name};
use crate::domain::error::{AppError, Result};
use crate::domain::upload::{StoredUpload, UploadRequest, UploadStore};

/// Accepts one uploaded file: checks the name against the allow-list, enforces the
/// size limit and writes it to the store. The content itself is not interpreted.
pub struct UploadIntakeUseCase {
    store: Arc<dyn UploadStore>,
    allowed_extensions: Vec<String>,
    max_upload_bytes: usize,
}

impl UploadIntakeUseCase {
    pub fn new(
        store: Arc<dyn UploadStore>,
        allowed_extensions: Vec<String>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            store,
            allowed_extensions,
            max_upload_bytes,
        }
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub async fn execute(&self, request: UploadRequest) -> Result<StoredUpload> {
        let original = request.filename().ok_or(AppError::MissingFile)?.to_string();

        if !has_allowed_extension(&original, &self.allowed_extensions) {
            return Err(AppError::UnsupportedFileType(original));
        }
        if request.content.len() > self.max_upload_bytes {
            return Err(AppError::PayloadTooLarge(self.max_upload_bytes));
        }

        let stored_filename = storage_name(&original, &self.allowed_extensions);
        let sha256 = hex::encode(Sha256::digest(&request.content));
        let path = self.store.save(&stored_filename, &request.content).await?;

        Ok(StoredUpload {
            original_filename: original,
            stored_filename,
            path,
            size_bytes: request.content.len() as u64,
            sha256,
            content_type: request.content_type,
            received_at: Utc::now(),
        })
    }
}
