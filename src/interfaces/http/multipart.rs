use actix_multipart::Multipart;
use futures_util::TryStreamExt;

use crate::application::use_cases::filename::has_allowed_extension;
use crate::domain::error::{AppError, Result};
use crate::domain::upload::{UploadRequest, FILE_FIELD};

fn malformed(err: impl std::fmt::Display) -> AppError {
    AppError::ValidationError(format!("Malformed multipart body: {}", err))
}

/// Reads the first part named `file` from a multipart body.
///
/// Other parts are drained and dropped. A named file outside `allowed` fails with
/// `UnsupportedFileType` before any of its bytes are read. Stops reading and fails
/// with `PayloadTooLarge` once the file part exceeds `limit` bytes.
pub async fn read_file_part(
    mut multipart: Multipart,
    allowed: &[String],
    limit: usize,
) -> Result<Option<UploadRequest>> {
    let mut upload: Option<UploadRequest> = None;

    while let Some(mut field) = multipart.try_next().await.map_err(malformed)? {
        let wanted = upload.is_none() && field.name() == Some(FILE_FIELD);
        if !wanted {
            while field.try_next().await.map_err(malformed)?.is_some() {}
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());

        if let Some(name) = filename.as_deref().filter(|name| !name.is_empty()) {
            if !has_allowed_extension(name, allowed) {
                return Err(AppError::UnsupportedFileType(name.to_string()));
            }
        }

        let mut content = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            if content.len() + chunk.len() > limit {
                return Err(AppError::PayloadTooLarge(limit));
            }
            content.extend_from_slice(&chunk);
        }

        upload = Some(UploadRequest {
            field_name: FILE_FIELD.to_string(),
            filename,
            content_type,
            content,
        });
    }

    Ok(upload)
}

#[cfg(test)]
pub(crate) mod test_support {
    pub const BOUNDARY: &str = "----arimaIntakeBoundary7MA4YWxk";

    pub enum Part<'a> {
        Text(&'a str, &'a str),
        File {
            name: &'a str,
            filename: &'a str,
            content_type: &'a str,
            content: &'a [u8],
        },
    }

    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={}", BOUNDARY)
    }

    pub fn body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut out = Vec::new();
        for part in parts {
            out.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    out.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    out.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    filename,
                    content_type,
                    content,
                } => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                            name, filename, content_type
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(content);
                }
            }
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        out
    }

    pub fn csv_file<'a>(filename: &'a str, content: &'a [u8]) -> Part<'a> {
        Part::File {
            name: "file",
            filename,
            content_type: "text/csv",
            content,
        }
    }
}
