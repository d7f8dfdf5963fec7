//! Server error types.
//!
//! [`ApiError`] is returned by handlers and implements
//! `axum::response::IntoResponse` to produce structured JSON error responses.
//! Because it is a response, a negotiated handler that fails with an
//! `ApiError` passes it through untouched. [`ServerError`] covers startup.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Route or entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
        };

        let detail = ApiErrorDetail {
            code: code.to_string(),
            message,
        };
        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Failures that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("template '{name}' is not available in {dir}")]
    MissingTemplate { name: String, dir: String },

    #[error("built-in templates failed to load: {0}")]
    Templates(#[from] haggle_core::minijinja::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
