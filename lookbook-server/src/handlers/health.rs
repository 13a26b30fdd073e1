//! Health check handlers
//!
//! Provides health and readiness endpoints for monitoring and orchestration.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::handlers::{run_blocking, AppState};

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    #[schema(example = "healthy")]
    pub status: &'static str,
    /// Server version from Cargo.toml
    pub version: &'static str,
    /// Service name
    pub service: &'static str,
}

/// GET /health - Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "lookbook-server",
    })
}

/// Readiness response
#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Whether the catalog mapping can be read
    pub ready: bool,
    /// Number of catalog entries
    pub entries: usize,
    /// Optional message explaining status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /ready - Readiness probe
///
/// Ready when the catalog mapping loads; reports the entry count.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses((status = 200, description = "Readiness and catalog size", body = ReadyResponse))
)]
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let catalog = state.catalog.clone();
    let loaded = run_blocking(move || catalog.entries().map_err(Into::into)).await;

    let response = match loaded {
        Ok(mapping) => ReadyResponse {
            ready: true,
            entries: mapping.len(),
            message: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Catalog mapping unavailable");
            ReadyResponse {
                ready: false,
                entries: 0,
                message: Some("catalog mapping unavailable".to_string()),
            }
        }
    };
    Json(response)
}
