//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use solcanvas_core::{CoreError, FieldError};
use solcanvas_sandbox::SandboxError;
use solcanvas_storage::StorageError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured details (e.g., field errors).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Form validation failed (422).
    #[error("validation failed")]
    ValidationFailed(Vec<FieldError>),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),

    /// The request does not fit the editor's current state (409).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl ApiError {
    fn detail(code: &str, message: String) -> ApiErrorDetail {
        ApiErrorDetail {
            code: code.to_string(),
            message,
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ApiError::detail("NOT_FOUND", msg.clone()),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::detail("BAD_REQUEST", msg.clone()),
            ),
            ApiError::ValidationFailed(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorDetail {
                    code: "VALIDATION_FAILED".to_string(),
                    message: format!("{} validation error(s)", errors.len()),
                    details: serde_json::to_value(errors).ok(),
                },
            ),
            ApiError::InternalError(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::detail("INTERNAL_ERROR", msg.clone()),
                )
            }
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ApiError::detail("CONFLICT", msg.clone()),
            ),
        };

        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ComponentNotFound { .. } => ApiError::NotFound(err.to_string()),
            CoreError::DuplicateComponent { .. } | CoreError::InvalidDrag { .. } => {
                ApiError::Conflict(err.to_string())
            }
            CoreError::KindMismatch { .. } | CoreError::InvalidConnection { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            CoreError::Validation { errors } => ApiError::ValidationFailed(errors),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::ProjectNotFound(_) | StorageError::ContractNotFound { .. } => {
                ApiError::NotFound(err.to_string())
            }
            StorageError::DuplicateContract { .. } | StorageError::IntegrityError { .. } => {
                ApiError::Conflict(err.to_string())
            }
            StorageError::InvalidName { .. } => ApiError::BadRequest(err.to_string()),
            _ => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<SandboxError> for ApiError {
    fn from(err: SandboxError) -> Self {
        match &err {
            SandboxError::InvalidPath { .. } => ApiError::BadRequest(err.to_string()),
            _ => ApiError::InternalError(err.to_string()),
        }
    }
}
