//! Clothing upload handler
//!
//! Handles POST /upload_clothing: rank the catalog against an uploaded photo.

use axum::{
    extract::{Multipart, State},
    Json,
};
use lookbook_core::{CatalogError, DEFAULT_RECOMMENDATIONS};

use crate::error::ApiError;
use crate::handlers::{run_blocking, AppState, ItemSlot, ItemsResponse};
use crate::multipart::MultipartFields;
use crate::upload::TempUpload;

/// Recommend catalog items similar to an uploaded clothing photo
///
/// Accepts multipart/form-data with a single **file** field (png, jpg or
/// jpeg). The response always holds exactly five slots, closest first; slots
/// beyond the catalog size are null. Barcode images are rejected.
#[utoipa::path(
    post,
    path = "/upload_clothing",
    tag = "Recommendations",
    request_body(
        content_type = "multipart/form-data",
        description = "Clothing photo in the 'file' field"
    ),
    responses(
        (status = 200, description = "Five recommendation slots", body = ItemsResponse),
        (status = 400, description = "Missing file, wrong type, unreadable image, or a barcode was uploaded"),
        (status = 413, description = "Request body too large"),
        (status = 500, description = "Processing failed")
    )
)]
pub async fn upload_clothing_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ItemsResponse>, ApiError> {
    let file = MultipartFields::parse(&mut multipart, state.max_file_size)
        .await?
        .require_file()?;
    let upload = TempUpload::store(&file)?;
    tracing::info!(name = upload.name(), bytes = file.data.len(), "Clothing upload received");

    let catalog = state.catalog.clone();
    let slots = run_blocking(move || {
        if catalog.is_symbol_file(upload.path()) {
            return Err(ApiError::NotAnItemImage);
        }
        let exclude = upload.catalog_reference(&catalog.layout().items_dir);
        match catalog.recommend_for_item_file(upload.path(), &exclude, DEFAULT_RECOMMENDATIONS) {
            Ok(slots) => Ok(slots),
            Err(CatalogError::UnreadableImage(e)) => Err(ApiError::unreadable_image(e)),
            Err(e) => Err(e.into()),
        }
    })
    .await?;

    tracing::info!(
        found = slots.iter().flatten().count(),
        "Recommendations computed"
    );

    let items = slots
        .into_iter()
        .map(|slot| ItemSlot {
            url: slot.map(|r| r.url()),
        })
        .collect();
    Ok(Json(ItemsResponse::new(items)))
}
