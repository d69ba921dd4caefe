use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value as JsonValue;

use crate::dto::QueryResponse;
use crate::error::ApiError;
use crate::services::QueryService;
use crate::state::AppState;

pub async fn query_region(
    State(state): State<Arc<AppState>>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(body) = body.map_err(|e| {
        ApiError::bad_request("Invalid JSON body").with_details(e.body_text())
    })?;

    tracing::debug!("Processing region query");

    let response = QueryService::query(&state, &body).await?;

    Ok(Json(response))
}
