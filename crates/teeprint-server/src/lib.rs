//! Teeprint proxy server
//!
//! Forwards user-listing queries to the remote listing API and serves the
//! t-shirt template assets.
//!
//! ## Routes
//!
//! - `GET /api/users?paginate=&search=&page=` returns the upstream JSON
//!   unchanged, or 500 `{"error":"Failed to fetch data"}`.
//! - `GET /health` returns `ok`.
//! - `GET /assets/*` serves the assets directory.

pub mod config;
pub mod proxy;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use config::{ConfigError, ServerConfig};
pub use proxy::{ListingParams, ProxyError, ProxyState};

/// Build the application router.
pub fn router(config: &ServerConfig) -> Router {
    let state = Arc::new(ProxyState::new(config.upstream_url.clone()));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/users", get(proxy::list_users))
        .nest_service("/assets", ServeDir::new(&config.assets_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Index page
async fn index() -> &'static str {
    "Teeprint API proxy - GET /api/users"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}
