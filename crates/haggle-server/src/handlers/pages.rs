//! Demo pages registered through `Negotiator::wrap` and `wrap_sync`.

use axum::extract::Request;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use crate::error::ApiError;

fn page() -> Value {
    json!({ "head": "HEAD", "text": "text" })
}

/// `ANY /async`
pub async fn async_page(_request: Request) -> Value {
    page()
}

/// `ANY /sync`
pub fn sync_page(_request: Request) -> Value {
    page()
}

/// Builds its own response, so negotiation leaves it alone.
///
/// `ANY /normal`
pub fn normal_page(_request: Request) -> Response {
    "Hello, world!".into_response()
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
