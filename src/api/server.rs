//! HTTP server setup and routing
//!
//! Sets up the Axum HTTP server. There is deliberately no shared mutable
//! state: each request is handled independently, and the only cross-request
//! resource is the temp-directory namespace (unique file names prevent
//! collisions between concurrent requests).

use super::handlers;
use crate::config::Config;
use crate::error::{Error, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the API router.
pub fn create_router(config: &Config) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(handlers::health))
        // Analysis endpoint (trailing slash is part of the public contract)
        .route("/analyze/", post(handlers::analyze))
        // Uploads are read fully into memory, so cap the body size
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}

/// Run the HTTP API server until the shutdown future resolves.
pub async fn run(config: Config, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
    let app = create_router(&config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Http(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::Http(format!("Server error: {}", e)))?;

    Ok(())
}
