//! Negotiation error types.
//!
//! Uses `thiserror` for the three failure modes of a negotiated handler.
//! [`NegotiationError`] implements `axum::response::IntoResponse`, so a
//! failure flows into axum's normal response pipeline as a structured JSON
//! 500 instead of being recovered locally.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Boxed error produced by a template engine.
pub type TemplateError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while turning a handler result into a response.
#[derive(Debug, Error)]
pub enum NegotiationError {
    /// The handler produced something that is neither a finalized response
    /// nor a string-keyed mapping. This is a programming error.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// The template engine could not resolve or render the named template.
    #[error("template '{name}' could not be rendered: {source}")]
    TemplateResolution {
        name: String,
        #[source]
        source: TemplateError,
    },

    /// The mapping contains a value JSON cannot encode.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NegotiationError {
    /// Machine-readable code used in the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            NegotiationError::ContractViolation(_) => "CONTRACT_VIOLATION",
            NegotiationError::TemplateResolution { .. } => "TEMPLATE_RESOLUTION",
            NegotiationError::Serialization(_) => "SERIALIZATION",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorDetail<'a> {
    code: &'a str,
    message: String,
}

impl IntoResponse for NegotiationError {
    fn into_response(self) -> Response {
        let detail = ErrorDetail {
            code: self.code(),
            message: self.to_string(),
        };
        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
