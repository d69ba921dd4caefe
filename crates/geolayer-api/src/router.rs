use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Default request body limit for uploads
pub const DEFAULT_UPLOAD_LIMIT: usize = 64 * 1024 * 1024;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    create_router_with_limit(state, DEFAULT_UPLOAD_LIMIT)
}

/// Create the API router, capping request bodies at `upload_limit` bytes
pub fn create_router_with_limit(state: Arc<AppState>, upload_limit: usize) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))
        // Layers
        .route("/upload", post(handlers::upload_layers))
        .route("/query", post(handlers::query_region))
        .route("/layers", get(handlers::list_layers))
        .route("/layers/{layer_id}", get(handlers::get_layer))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
