use geojson::JsonObject;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// One entry of an uploaded `features` array
///
/// Geometry stays raw JSON here so that a null or absent geometry can pass
/// through and a malformed one is reported against its feature.
#[derive(Debug, Deserialize)]
pub struct UploadedFeature {
    #[serde(rename = "type", default = "default_feature_type")]
    pub feature_type: String,
    #[serde(default)]
    pub id: Option<JsonValue>,
    #[serde(default)]
    pub geometry: Option<JsonValue>,
    #[serde(default)]
    pub properties: Option<JsonObject>,
}

fn default_feature_type() -> String {
    "Feature".to_string()
}
