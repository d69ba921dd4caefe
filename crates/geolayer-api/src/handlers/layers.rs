use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use geolayer_core::models::{LayerDetail, LayerId, LayerSummary};
use geolayer_core::GeolayerError;

use crate::error::ApiError;
use crate::state::AppState;

/// List every stored layer with the configured property sub-fields
pub async fn list_layers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LayerSummary>>, ApiError> {
    let layers = state.store.list_layers(&state.summary_fields).await?;
    Ok(Json(layers))
}

/// Fetch geometry and properties of one layer
pub async fn get_layer(
    State(state): State<Arc<AppState>>,
    Path(layer_id): Path<String>,
) -> Result<Json<LayerDetail>, ApiError> {
    let id: LayerId = layer_id.parse()?;

    let detail = state
        .store
        .get_layer(id)
        .await?
        .ok_or(GeolayerError::NotFound { id: layer_id })?;

    Ok(Json(detail))
}
