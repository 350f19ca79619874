//! API error type and its status-code mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use carebridge_schema::ValidationError;
use carebridge_storage::StorageError;
use serde_json::json;

/// Request failure, ready to serialize as the API's error body
#[derive(Debug)]
pub enum ApiError {
    /// 400 with the per-field violation list
    Validation(ValidationError),
    /// 404 with a message naming the missing entity
    NotFound(&'static str),
    /// 409, the operation conflicts with existing state
    Conflict(String),
    /// 500, logged server-side with detail
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: &'static str) -> Self {
        Self::NotFound(message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(message) => Self::Conflict(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "Validation error",
                    "errors": err.violations,
                })),
            )
                .into_response(),
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Conflict(message) => {
                (StatusCode::CONFLICT, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
