//! Upload validation module
//!
//! Provides validation utilities for multipart file uploads.

use std::path::Path;

use lookbook_core::{is_item_image, ITEM_EXTENSIONS};

use crate::error::ApiError;

/// Allowed MIME type categories for image uploads
const ALLOWED_MIME_PREFIXES: &[&str] = &["image/", "application/octet-stream"];

/// Default max file size in bytes (10 MB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Validates the Content-Type of an uploaded file
///
/// Accepts image/* and application/octet-stream. A missing Content-Type is
/// treated as binary.
pub fn validate_content_type(content_type: Option<&str>) -> Result<(), ApiError> {
    match content_type {
        Some(ct) => {
            let ct_lower = ct.to_lowercase();
            if ALLOWED_MIME_PREFIXES
                .iter()
                .any(|prefix| ct_lower.starts_with(prefix))
            {
                Ok(())
            } else {
                Err(ApiError::bad_input(format!(
                    "Unsupported Content-Type: '{}'. Allowed types: image/*, application/octet-stream",
                    ct
                )))
            }
        }
        None => Ok(()),
    }
}

/// Validates the size of an uploaded file
///
/// Returns an error if the file is empty or exceeds the maximum size.
pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), ApiError> {
    if size == 0 {
        return Err(ApiError::bad_input("Uploaded file is empty"));
    }
    if size > max_size {
        let max_mb = max_size / (1024 * 1024);
        let actual_mb = size / (1024 * 1024);
        Err(ApiError::bad_input(format!(
            "File too large: {} MB exceeds maximum of {} MB",
            actual_mb, max_mb
        )))
    } else {
        Ok(())
    }
}

/// Reduce a client supplied file name to a safe, flat name.
///
/// Directory components are dropped, whitespace becomes `_`, and anything
/// outside `[A-Za-z0-9._-]` is removed. Leading dots and underscores are
/// stripped so the result can never be hidden or relative. Returns `None`
/// when nothing usable remains.
pub fn secure_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let trimmed = cleaned.trim_start_matches(['.', '_']);
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Validate an upload's file name and return its sanitized form.
pub fn validate_upload_name(file_name: Option<&str>) -> Result<String, ApiError> {
    let raw = file_name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_input("No selected file"))?;
    let name = secure_filename(raw).ok_or_else(|| ApiError::bad_input("Invalid file name"))?;
    if !is_item_image(Path::new(&name)) {
        return Err(ApiError::bad_input(format!(
            "Invalid file type. Allowed extensions: {}",
            ITEM_EXTENSIONS.join(", ")
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_type_image() {
        assert!(validate_content_type(Some("image/jpeg")).is_ok());
        assert!(validate_content_type(Some("image/png")).is_ok());
        assert!(validate_content_type(Some("IMAGE/PNG")).is_ok()); // case insensitive
        assert!(validate_content_type(Some("application/octet-stream")).is_ok());
        assert!(validate_content_type(None).is_ok());
    }

    #[test]
    fn test_validate_content_type_rejected() {
        assert!(validate_content_type(Some("text/html")).is_err());
        assert!(validate_content_type(Some("application/json")).is_err());
        assert!(validate_content_type(Some("video/mp4")).is_err());
    }

    #[test]
    fn test_validate_file_size() {
        let max = 10 * 1024 * 1024;
        assert!(validate_file_size(1024, max).is_ok());
        assert!(validate_file_size(max, max).is_ok()); // exactly max
        assert!(validate_file_size(max + 1, max).is_err());
        assert!(validate_file_size(0, max).is_err());
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("shirt.png").as_deref(), Some("shirt.png"));
        assert_eq!(secure_filename("my red shirt.jpg").as_deref(), Some("my_red_shirt.jpg"));
        assert_eq!(secure_filename("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(secure_filename("C:\\photos\\dress.JPG").as_deref(), Some("dress.JPG"));
        assert_eq!(secure_filename(".hidden.png").as_deref(), Some("hidden.png"));
        assert_eq!(secure_filename("..").as_deref(), None);
        assert_eq!(secure_filename("\u{1F457}").as_deref(), None);
    }

    #[test]
    fn test_validate_upload_name() {
        assert_eq!(validate_upload_name(Some("a b.JPEG")).unwrap(), "a_b.JPEG");
        assert!(validate_upload_name(None).is_err());
        assert!(validate_upload_name(Some("")).is_err());
        assert!(validate_upload_name(Some("notes.txt")).is_err());
        assert!(validate_upload_name(Some("noextension")).is_err());
    }
}
