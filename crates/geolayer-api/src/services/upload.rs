use geojson::Geometry;
use geolayer_core::error::{GeolayerError, Result};
use geolayer_core::models::LayerRecord;
use serde_json::Value as JsonValue;

use crate::dto::{UploadResponse, UploadedFeature};
use crate::error::ApiError;
use crate::state::AppState;

/// Service for storing uploaded feature collections
pub struct UploadService;

impl UploadService {
    /// Parse, normalize and store every feature of an uploaded collection
    ///
    /// Nothing is stored unless every feature parses and normalizes.
    pub async fn upload(
        state: &AppState,
        data: &[u8],
    ) -> std::result::Result<UploadResponse, ApiError> {
        let mut records = parse_feature_collection(data)?;

        let reprojected = state
            .normalizer
            .normalize_geometries(records.iter_mut().filter_map(|r| r.geometry.as_mut()))?;

        let ids = state.store.insert_many(&records).await?;

        tracing::info!(inserted = ids.len(), reprojected, "Stored uploaded features");

        Ok(UploadResponse::success(ids.len()))
    }
}

/// Parse a GeoJSON FeatureCollection body into layer records
///
/// Only the `features` array is required at the top level.
pub fn parse_feature_collection(data: &[u8]) -> Result<Vec<LayerRecord>> {
    let body: JsonValue = serde_json::from_slice(data)
        .map_err(|e| GeolayerError::format(format!("Body is not valid JSON: {}", e)))?;

    let features = body
        .as_object()
        .and_then(|object| object.get("features"))
        .and_then(JsonValue::as_array)
        .ok_or_else(|| GeolayerError::format("expected an object with a 'features' array"))?;

    features
        .iter()
        .enumerate()
        .map(|(index, feature)| parse_feature(index, feature))
        .collect()
}

fn parse_feature(index: usize, feature: &JsonValue) -> Result<LayerRecord> {
    if !feature.is_object() {
        return Err(GeolayerError::format(format!("feature {} is not an object", index)));
    }

    let uploaded: UploadedFeature = serde_json::from_value(feature.clone())
        .map_err(|e| GeolayerError::format(format!("feature {}: {}", index, e)))?;

    let geometry = match uploaded.geometry {
        None | Some(JsonValue::Null) => None,
        Some(value) => Some(serde_json::from_value::<Geometry>(value).map_err(|e| {
            GeolayerError::format(format!("feature {} has an invalid geometry: {}", index, e))
        })?),
    };

    Ok(LayerRecord {
        feature_type: uploaded.feature_type,
        id: uploaded.id,
        geometry,
        properties: uploaded.properties,
    })
}
