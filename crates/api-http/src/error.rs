//! HTTP Error Mapping
//!
//! Maps application errors to HTTP status codes. All invocation failure
//! subkinds collapse into one generic 500 for the caller; the
//! distinguishing reason stays in the logs only.

use axum::http::StatusCode;
use tracing::error;

use adoptml_core::error::AppError;

/// Generic server-error body (never leaks the failure subkind)
pub const PREDICTION_FAILED: &str = "Prediction failed";

/// Convert AppError to an HTTP status and textual body
pub fn to_http_error(err: AppError) -> (StatusCode, String) {
    match err {
        AppError::Domain(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        AppError::Serialization(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        AppError::Invocation(e) => {
            error!(failure_kind = e.kind(), error = %e, "Invocation failure collapsed to 500");
            (StatusCode::INTERNAL_SERVER_ERROR, PREDICTION_FAILED.to_string())
        }
        AppError::Io(e) => {
            error!(error = %e, "IO failure");
            (StatusCode::INTERNAL_SERVER_ERROR, PREDICTION_FAILED.to_string())
        }
        AppError::Config(msg) | AppError::Internal(msg) => {
            error!(error = %msg, "Internal failure");
            (StatusCode::INTERNAL_SERVER_ERROR, PREDICTION_FAILED.to_string())
        }
    }
}
