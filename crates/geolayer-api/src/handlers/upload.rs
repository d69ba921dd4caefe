use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::dto::UploadResponse;
use crate::error::ApiError;
use crate::services::UploadService;
use crate::state::AppState;

const GEOJSON_MEDIA_TYPES: [&str; 2] = ["application/json", "application/geo+json"];

pub async fn upload_layers(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        ApiError::bad_request("Expected a multipart form").with_details(e.body_text())
    })?;

    let (filename, data) = extract_file(&mut multipart).await?;

    tracing::info!(filename = %filename, size = data.len(), "Received file for upload");

    let response = UploadService::upload(&state, &data).await?;

    Ok(Json(response))
}

async fn extract_file(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError {
        status: e.status(),
        message: "Failed to parse multipart form".to_string(),
        details: Some(e.body_text()),
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        if !is_geojson_media_type(&content_type) {
            return Err(ApiError::bad_request("Only GeoJSON files are allowed")
                .with_details(format!("Received content type '{}'", content_type)));
        }

        let filename = field.file_name().unwrap_or("upload.geojson").to_string();
        let data = field.bytes().await.map_err(|e| ApiError {
            status: e.status(),
            message: "Failed to read file data".to_string(),
            details: Some(e.body_text()),
        })?;
        return Ok((filename, data.to_vec()));
    }

    Err(ApiError::bad_request("No file provided")
        .with_details("Expected a 'file' field in the multipart form"))
}

/// Match the media type, ignoring parameters and case
fn is_geojson_media_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    GEOJSON_MEDIA_TYPES.contains(&essence.as_str())
}
