//! Server error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Server error type.
///
/// Rendered as a JSON body carrying a generic message and the service's
/// availability-zone tag; raw database error text never reaches clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Payload failed validation: missing field, empty name, or an
    /// unrecognized status label.
    #[error("invalid data")]
    InvalidData { zone: String },

    /// The store could not serve the request.
    #[error("storage unavailable")]
    StorageUnavailable { zone: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, zone) = match self {
            ApiError::InvalidData { zone } => (StatusCode::BAD_REQUEST, "Invalid data", zone),
            ApiError::StorageUnavailable { zone } => {
                (StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable", zone)
            }
        };

        let body = json!({
            "error": message,
            "zone": zone,
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handler operations.
pub type ApiResult<T> = Result<T, ApiError>;
