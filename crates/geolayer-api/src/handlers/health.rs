use axum::{response::IntoResponse, Json};

use crate::dto::HealthResponse;

/// Liveness probe, independent of the store
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse::default())
}
