use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geolayer_core::GeolayerError;
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                details = self.details.as_deref().unwrap_or(""),
                "{}",
                self.message
            );
        }

        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<GeolayerError> for ApiError {
    fn from(err: GeolayerError) -> Self {
        let details = err.to_string();
        match err {
            GeolayerError::Format { .. } => Self::bad_request("Invalid GeoJSON format"),
            GeolayerError::UnsupportedGeometry { .. } => {
                Self::bad_request("Unsupported geometry")
            }
            GeolayerError::Transform { .. } => {
                Self::bad_request("Failed to transform coordinates")
            }
            GeolayerError::InvalidIdentifier { .. } => Self::bad_request("Invalid layer ID"),
            GeolayerError::NotFound { .. } => Self::not_found("Layer not found"),
            GeolayerError::Store(_) => Self::internal("Database error"),
            _ => Self::internal("Internal error"),
        }
        .with_details(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GeolayerError::format("missing 'features'"), StatusCode::BAD_REQUEST),
            (GeolayerError::unsupported("LineString"), StatusCode::BAD_REQUEST),
            (GeolayerError::transform(1e9, 1e9, "out of area"), StatusCode::BAD_REQUEST),
            (
                GeolayerError::InvalidIdentifier { value: "abc".into() },
                StatusCode::BAD_REQUEST,
            ),
            (GeolayerError::NotFound { id: "x".into() }, StatusCode::NOT_FOUND),
            (GeolayerError::Store("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                GeolayerError::Serialization("bad".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_details_carry_cause() {
        let err = ApiError::from(GeolayerError::InvalidIdentifier { value: "abc".into() });
        assert_eq!(err.message, "Invalid layer ID");
        assert_eq!(err.details.as_deref(), Some("Invalid layer ID: abc"));
    }
}
