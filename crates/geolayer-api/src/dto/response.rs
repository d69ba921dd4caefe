use geolayer_core::models::StoredLayer;
use serde::Serialize;

/// Upload operation response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub inserted: usize,
}

impl UploadResponse {
    pub fn success(inserted: usize) -> Self {
        Self {
            message: "File uploaded successfully".to_string(),
            inserted,
        }
    }
}

/// Region query response
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub features: Vec<StoredLayer>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "geolayer-api" }
    }
}
