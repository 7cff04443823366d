/// Error handling for the API server
///
/// A single `ApiError` type maps every failure onto an HTTP status and a
/// machine-readable error code. The store's four-variant taxonomy arrives
/// through `From<StoreError>` and keeps its distinctions on the wire:
/// validation, not-found and authorization failures are never collapsed
/// into a generic 500.
///
/// # Example
///
/// ```no_run
/// use cadence_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     Err(ApiError::NotFound("task abc123".to_string()))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cadence_store::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - malformed request shape
    BadRequest(String),

    /// Unauthorized (401) - missing or invalid session
    Unauthorized(String),

    /// Forbidden (403) - caller is not owner/author/ADMIN
    Forbidden(String),

    /// Not found (404) - referenced id absent
    NotFound(String),

    /// Unprocessable entity (422) - input failed validation
    Validation(String),

    /// Internal server error (500) - storage or other engine failure
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "not_found", "validation_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg)
            }
            ApiError::InternalError(msg) => {
                // Log internals but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Convert store errors to API errors, keeping the taxonomy intact
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => ApiError::Validation(msg),
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            StoreError::Authorization(msg) => ApiError::Forbidden(msg),
            StoreError::Storage(e) => ApiError::InternalError(format!("Storage error: {}", e)),
        }
    }
}

/// Convert raw sqlx errors (auth middleware lookups) to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::InternalError(format!("Database error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFound("task abc123".to_string());
        assert_eq!(err.to_string(), "Not found: task abc123");

        let err = ApiError::Validation("title must not be empty".to_string());
        assert_eq!(err.to_string(), "Validation failed: title must not be empty");
    }

    #[test]
    fn test_store_error_mapping_is_lossless() {
        let err: ApiError = StoreError::validation("bad quota").into();
        assert!(matches!(err, ApiError::Validation(_)));

        let err: ApiError = StoreError::not_found("task").into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = StoreError::authorization("not yours").into();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err: ApiError = StoreError::Storage(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, ApiError::InternalError(_)));
    }
}
