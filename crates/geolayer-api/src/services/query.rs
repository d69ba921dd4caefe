use geojson::Geometry;
use geolayer_core::error::{GeolayerError, Result};
use serde_json::Value as JsonValue;

use crate::dto::QueryResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Service for region queries
pub struct QueryService;

impl QueryService {
    /// Find every stored layer intersecting the request's geometry
    pub async fn query(
        state: &AppState,
        body: &JsonValue,
    ) -> std::result::Result<QueryResponse, ApiError> {
        let mut region = parse_region(body)?;

        if state.normalize_query_geometry {
            state.normalizer.normalize_geometry(&mut region)?;
        }

        let features = state.store.find_intersecting(&region).await?;

        tracing::info!(matches = features.len(), "Region query complete");

        Ok(QueryResponse { features })
    }
}

/// Extract the `geometry` member of a region query body
pub fn parse_region(body: &JsonValue) -> Result<Geometry> {
    let geometry = body
        .get("geometry")
        .filter(|value| !value.is_null())
        .ok_or_else(|| GeolayerError::format("missing geometry field"))?;

    let object = geometry
        .as_object()
        .ok_or_else(|| GeolayerError::format("geometry must be an object"))?;

    for key in ["type", "coordinates"] {
        if !object.contains_key(key) {
            return Err(GeolayerError::format(format!("geometry is missing '{}'", key)));
        }
    }

    serde_json::from_value(geometry.clone())
        .map_err(|e| GeolayerError::format(format!("geometry cannot be parsed: {}", e)))
}
