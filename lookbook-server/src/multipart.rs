//! Multipart form parsing helpers
//!
//! Both upload endpoints take a single `file` field; other fields are ignored.

use axum::extract::Multipart;

use crate::error::ApiError;
use crate::validation::{validate_content_type, validate_file_size};

/// Represents a file uploaded via multipart form
#[derive(Debug, Clone)]
pub struct FileField {
    /// File data bytes
    pub data: Vec<u8>,
    /// Content-Type from the multipart field (if provided)
    pub content_type: Option<String>,
    /// Original filename from the multipart field (if provided)
    pub file_name: Option<String>,
}

/// Parsed multipart form fields
#[derive(Debug, Default)]
pub struct MultipartFields {
    /// File field named "file"
    file: Option<FileField>,
}

impl MultipartFields {
    /// Parse all fields from a multipart request
    ///
    /// The `file` field's Content-Type and size are validated while reading.
    pub async fn parse(multipart: &mut Multipart, max_file_size: usize) -> Result<Self, ApiError> {
        let mut file: Option<FileField> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_input(format!("Failed to parse multipart: {}", e)))?
        {
            if field.name() != Some("file") {
                continue;
            }

            let content_type = field.content_type().map(|s| s.to_string());
            let file_name = field.file_name().map(|s| s.to_string());
            validate_content_type(content_type.as_deref())?;

            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_input(format!("Failed to read file: {}", e)))?
                .to_vec();

            file = Some(FileField {
                data,
                content_type,
                file_name,
            });
        }

        if let Some(file) = &file {
            validate_file_size(file.data.len(), max_file_size)?;
        }

        Ok(Self { file })
    }

    /// Take the file field
    ///
    /// Returns an error if no file was uploaded.
    pub fn require_file(self) -> Result<FileField, ApiError> {
        self.file
            .ok_or_else(|| ApiError::bad_input("No file part. Use 'file' field in multipart form."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_file_missing() {
        let fields = MultipartFields::default();
        let err = fields.require_file().unwrap_err();
        assert_eq!(err.error_code(), "BAD_INPUT");
    }

    #[test]
    fn test_require_file_present() {
        let fields = MultipartFields {
            file: Some(FileField {
                data: vec![1, 2, 3],
                content_type: Some("image/png".into()),
                file_name: Some("a.png".into()),
            }),
        };
        assert_eq!(fields.require_file().unwrap().data, vec![1, 2, 3]);
    }
}
