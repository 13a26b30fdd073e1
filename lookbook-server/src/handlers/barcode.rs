//! Barcode upload handler
//!
//! Handles POST /upload_barcode: decode a photographed symbol, resolve it to a
//! catalog item and return that item's recommendations.

use axum::{
    extract::{Multipart, State},
    Json,
};
use lookbook_core::{CatalogError, DEFAULT_RECOMMENDATIONS};

use crate::error::ApiError;
use crate::handlers::{run_blocking, AppState, ItemSlot, ItemsResponse};
use crate::multipart::MultipartFields;
use crate::upload::TempUpload;

/// Recommend items similar to the one a scanned barcode belongs to
///
/// Accepts multipart/form-data with a single **file** field holding a photo
/// of an EAN-13 symbol. Several preprocessing variants are tried before
/// giving up. Only non-empty recommendations are returned.
#[utoipa::path(
    post,
    path = "/upload_barcode",
    tag = "Barcodes",
    request_body(
        content_type = "multipart/form-data",
        description = "Barcode photo in the 'file' field"
    ),
    responses(
        (status = 200, description = "Recommendations for the matched item", body = ItemsResponse),
        (status = 400, description = "Missing file, wrong type, or invalid/unrecognized barcode"),
        (status = 413, description = "Request body too large"),
        (status = 500, description = "Processing failed")
    )
)]
pub async fn upload_barcode_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ItemsResponse>, ApiError> {
    let file = MultipartFields::parse(&mut multipart, state.max_file_size)
        .await?
        .require_file()?;
    let upload = TempUpload::store(&file)?;
    tracing::info!(name = upload.name(), bytes = file.data.len(), "Barcode upload received");

    let catalog = state.catalog.clone();
    let found = run_blocking(move || {
        let payload = match catalog.decode_symbol_file(upload.path()) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Err(ApiError::unrecognized_symbol("no barcode decoded")),
            Err(CatalogError::UnreadableImage(e)) => {
                return Err(ApiError::unrecognized_symbol(format!("unreadable upload: {}", e)))
            }
            Err(e) => return Err(e.into()),
        };
        tracing::info!(payload = %payload, "Decoded barcode");

        match catalog.recommend_for_symbol(&payload, DEFAULT_RECOMMENDATIONS) {
            Ok(Some(found)) => Ok(found),
            Ok(None) => Err(ApiError::unrecognized_symbol(format!("no match for {}", payload))),
            // The matched catalog item is broken, not the upload
            Err(CatalogError::UnreadableImage(e)) => {
                Err(ApiError::processing_failed(format!("catalog item unreadable: {}", e)))
            }
            Err(e) => Err(e.into()),
        }
    })
    .await?;

    tracing::info!(
        id = %found.id,
        item = %found.entry.clothing_path.display(),
        found = found.recommendations.len(),
        "Barcode resolved"
    );

    let items = found
        .recommendations
        .iter()
        .map(|r| ItemSlot { url: Some(r.url()) })
        .collect();
    Ok(Json(ItemsResponse::new(items)))
}
