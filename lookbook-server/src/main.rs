//! Lookbook Server - REST API for visual clothing recommendations
//!
//! Exposes lookbook-core functionality via HTTP endpoints:
//! - POST /upload_clothing - Similar items for a clothing photo
//! - POST /upload_barcode - Similar items for a scanned barcode
//! - GET /clothing/{name} - Catalog item images

use std::net::SocketAddr;

use lookbook_core::Catalog;
use lookbook_server::{create_router_with_config, AppState, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server terminated");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    let catalog = Catalog::open(config.layout());

    // The catalog must be complete before the first request is accepted
    let catalog = if config.skip_bootstrap {
        tracing::warn!("Bootstrap skipped, serving existing mapping");
        catalog
    } else {
        tokio::task::spawn_blocking(move || {
            let report = catalog.bootstrap()?;
            tracing::info!(
                scanned = report.scanned,
                entries = report.entries,
                failures = report.failures.len(),
                "Catalog ready"
            );
            Ok::<_, lookbook_core::CatalogError>(catalog)
        })
        .await??
    };

    let state = AppState::new(catalog).with_max_file_size(config.max_file_size());
    let app = create_router_with_config(state, &config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        root = %config.catalog_root.display(),
        "Lookbook server listening (docs at /docs)"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
