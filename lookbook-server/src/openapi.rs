//! OpenAPI documentation configuration
//!
//! Generates the OpenAPI 3.0 document served under `/docs`.

use utoipa::OpenApi;

use crate::handlers::{HealthResponse, ItemSlot, ItemsResponse, ReadyResponse};

/// Lookbook API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lookbook API",
        version = "0.1.0",
        description = r#"
## Visual clothing recommendations

- Upload a clothing photo to `POST /upload_clothing` and get the five most
  similar catalog items by dominant-color histogram.
- Upload a photo of an item's EAN-13 barcode to `POST /upload_barcode` to get
  recommendations for that item.
- Catalog images are served from `GET /clothing/{name}`.
"#,
        license(name = "MIT OR Apache-2.0")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    tags(
        (name = "Recommendations", description = "Similar-item search and item images"),
        (name = "Barcodes", description = "Barcode scanning and lookup"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::clothing::upload_clothing_handler,
        crate::handlers::barcode::upload_barcode_handler,
        crate::handlers::items::serve_item_handler,
    ),
    components(schemas(HealthResponse, ReadyResponse, ItemsResponse, ItemSlot))
)]
pub struct ApiDoc;
