//! Catalog item serving
//!
//! Handles GET /clothing/{name}.

use std::path::Path;

use axum::{
    extract::{Path as UrlPath, State},
    http::header,
    response::IntoResponse,
};

use crate::error::ApiError;
use crate::handlers::AppState;

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Serve a catalog item image by file name
#[utoipa::path(
    get,
    path = "/clothing/{name}",
    tag = "Recommendations",
    params(("name" = String, Path, description = "Item file name")),
    responses(
        (status = 200, description = "Raw image bytes"),
        (status = 404, description = "No such item")
    )
)]
pub async fn serve_item_handler(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let path = state
        .catalog
        .item_file(&name)
        .ok_or_else(|| ApiError::not_found(format!("item '{}'", name)))?;

    let data = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::not_found(format!("item '{}': {}", name, e)))?;

    Ok(([(header::CONTENT_TYPE, content_type_for(&path))], data))
}
