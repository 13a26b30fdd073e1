//! API error handling module
//!
//! Every failure is converted into a status code, a stable `code` string and
//! a generic client message. Internal details are logged, never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lookbook_core::CatalogError;
use thiserror::Error;

/// API error type with structured variants for different error categories
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, empty or wrongly typed upload
    #[error("Bad input: {0}")]
    BadInput(String),

    /// An item upload that turned out to be a barcode
    #[error("Upload is a barcode, not a clothing image")]
    NotAnItemImage,

    /// The upload is not a decodable image
    #[error("Unreadable image: {0}")]
    UnreadableImage(String),

    /// No payload decoded, or the payload matches no catalog entry
    #[error("Unrecognized barcode: {0}")]
    UnrecognizedSymbol(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other internal failure
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    /// Error raised by the catalog library
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl ApiError {
    pub fn bad_input(message: impl Into<String>) -> Self {
        Self::BadInput(message.into())
    }

    pub fn unreadable_image(message: impl Into<String>) -> Self {
        Self::UnreadableImage(message.into())
    }

    pub fn unrecognized_symbol(message: impl Into<String>) -> Self {
        Self::UnrecognizedSymbol(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn processing_failed(message: impl Into<String>) -> Self {
        Self::ProcessingFailed(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadInput(_)
            | Self::NotAnItemImage
            | Self::UnreadableImage(_)
            | Self::UnrecognizedSymbol(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            // Handlers map upload-side decode failures before they get here
            Self::ProcessingFailed(_) | Self::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadInput(_) => "BAD_INPUT",
            Self::NotAnItemImage => "NOT_AN_ITEM_IMAGE",
            Self::UnreadableImage(_) => "UNREADABLE_IMAGE",
            Self::UnrecognizedSymbol(_) => "UNRECOGNIZED_SYMBOL",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ProcessingFailed(_) | Self::Catalog(_) => "PROCESSING_FAILED",
        }
    }

    /// Get sanitized error message for client response
    fn client_message(&self) -> String {
        match self {
            Self::BadInput(msg) => msg.clone(),
            Self::NotAnItemImage => "Please upload a clothing image, not a barcode".to_string(),
            Self::UnreadableImage(_) => "Could not read the uploaded image".to_string(),
            Self::UnrecognizedSymbol(_) => "Invalid or unrecognized barcode".to_string(),
            Self::NotFound(_) => "Not found".to_string(),
            Self::ProcessingFailed(_) | Self::Catalog(_) => "Error processing image".to_string(),
        }
    }

    /// Get the error category for logging
    fn error_category(&self) -> &'static str {
        match self {
            Self::BadInput(_) => "bad_input",
            Self::NotAnItemImage => "not_an_item_image",
            Self::UnreadableImage(_) => "unreadable_image",
            Self::UnrecognizedSymbol(_) => "unrecognized_symbol",
            Self::NotFound(_) => "not_found",
            Self::ProcessingFailed(_) => "processing_failed",
            Self::Catalog(_) => "catalog",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.error_category();
        let code = self.error_code();
        let internal_message = self.to_string();
        let client_message = self.client_message();

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                category = category,
                code = code,
                error = %internal_message,
                "Server error"
            );
        } else {
            tracing::warn!(
                status = %status,
                category = category,
                code = code,
                error = %internal_message,
                "Client error"
            );
        }

        let body = serde_json::json!({
            "error": client_message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::bad_input("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotAnItemImage.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::unrecognized_symbol("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::processing_failed("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::unreadable_image("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CatalogError::InvalidDescriptor("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = ApiError::from(CatalogError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "/srv/secret/mapping.json",
        )));
        assert_eq!(err.error_code(), "PROCESSING_FAILED");
        assert!(!err.client_message().contains("secret"));
    }

    #[test]
    fn test_unreadable_upload_and_unreadable_catalog_item_differ() {
        let upload = ApiError::unreadable_image("upload.png: invalid signature");
        assert_eq!(upload.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(upload.error_code(), "UNREADABLE_IMAGE");
        assert_eq!(upload.client_message(), "Could not read the uploaded image");

        let item = ApiError::from(CatalogError::UnreadableImage(
            "/srv/shop/clothing/red_shirt.png: invalid signature".into(),
        ));
        assert_eq!(item.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(item.error_code(), "PROCESSING_FAILED");
        assert!(!item.client_message().contains("red_shirt"));
    }
}
