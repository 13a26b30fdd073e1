//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod barcode;
pub mod clothing;
pub mod health;
pub mod items;

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;

pub use crate::state::AppState;
pub use barcode::upload_barcode_handler;
pub use clothing::upload_clothing_handler;
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use items::serve_item_handler;

/// One recommendation slot
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemSlot {
    /// Item URL, or null when the catalog has fewer items than slots
    #[schema(example = "/clothing/red_shirt.jpg")]
    pub url: Option<String>,
}

/// Response of both upload endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemsResponse {
    #[schema(example = true)]
    pub success: bool,
    pub items: Vec<ItemSlot>,
}

impl ItemsResponse {
    pub fn new(items: Vec<ItemSlot>) -> Self {
        Self {
            success: true,
            items,
        }
    }
}

/// Run catalog work on the blocking pool.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::processing_failed(format!("Worker task failed: {}", e)))?
}
