//! Stored layer records and the projections returned to callers.
//!
//! A layer is one uploaded GeoJSON feature. The record keeps the feature's
//! `type`, `id` and `properties` as opaque JSON; only `geometry` is typed.

use geojson::{Geometry, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::GeolayerError;

/// Store-native identifier assigned to each record on insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub Uuid);

impl LayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for LayerId {
    type Err = GeolayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(LayerId)
            .map_err(|_| GeolayerError::InvalidIdentifier { value: s.to_string() })
    }
}

/// A feature as handed to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    #[serde(rename = "type")]
    pub feature_type: String,
    #[serde(default)]
    pub id: Option<JsonValue>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<JsonObject>,
}

impl LayerRecord {
    pub fn new(geometry: Option<Geometry>, properties: Option<JsonObject>) -> Self {
        Self {
            feature_type: "Feature".to_string(),
            id: None,
            geometry,
            properties,
        }
    }

    pub fn with_id(mut self, id: impl Into<JsonValue>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Keep only the named property sub-fields, as a store projection would
    pub fn summarize(&self, layer_id: LayerId, fields: &[String]) -> LayerSummary {
        let properties = self
            .properties
            .as_ref()
            .map(|props| {
                fields
                    .iter()
                    .filter_map(|field| props.get(field).map(|v| (field.clone(), v.clone())))
                    .collect()
            })
            .unwrap_or_default();

        LayerSummary { layer_id, properties }
    }

    pub fn detail(&self) -> LayerDetail {
        LayerDetail {
            geometry: self.geometry.clone(),
            properties: self.properties.clone(),
        }
    }
}

/// A record together with its store identifier, as returned by region queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredLayer {
    #[serde(rename = "_id")]
    pub layer_id: LayerId,
    #[serde(flatten)]
    pub record: LayerRecord,
}

/// Identifier plus the configured property sub-fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummary {
    #[serde(rename = "_id")]
    pub layer_id: LayerId,
    pub properties: JsonObject,
}

/// Geometry and properties of a single layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDetail {
    pub geometry: Option<Geometry>,
    pub properties: Option<JsonObject>,
}
