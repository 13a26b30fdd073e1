//! Temporary storage for uploaded files
//!
//! Uploads are decoded from disk and never join the catalog. The backing file
//! is removed when the [`TempUpload`] is dropped, whichever way the request
//! ends.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::ApiError;
use crate::multipart::FileField;
use crate::validation::validate_upload_name;

/// An upload written to a named temporary file.
#[derive(Debug)]
pub struct TempUpload {
    file: NamedTempFile,
    /// Sanitized client file name
    name: String,
}

impl TempUpload {
    /// Validate the upload's name and spill its bytes to a temporary file
    /// that keeps the original extension.
    pub fn store(field: &FileField) -> Result<Self, ApiError> {
        let name = validate_upload_name(field.file_name.as_deref())?;
        let suffix = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("lookbook-upload-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| ApiError::processing_failed(format!("Failed to create temp file: {}", e)))?;
        file.write_all(&field.data)
            .and_then(|()| file.flush())
            .map_err(|e| ApiError::processing_failed(format!("Failed to write upload: {}", e)))?;

        tracing::debug!(
            name = %name,
            bytes = field.data.len(),
            path = %file.path().display(),
            "Stored upload"
        );
        Ok(Self { file, name })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Catalog reference the upload would have inside `items_dir`; used as
    /// the self-exclusion key when ranking.
    pub fn catalog_reference(&self, items_dir: &Path) -> PathBuf {
        items_dir.join(&self.name)
    }
}
