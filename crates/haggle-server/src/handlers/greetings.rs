//! Greeting page that needs extractors beyond the raw request.

use axum::extract::{Path, State};
use axum::response::Response;
use haggle_core::{AcceptPreference, Mapping, NegotiationError};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

const MAX_NAME_LEN: usize = 64;

#[derive(Debug, Serialize)]
pub struct Greeting {
    pub name: String,
    pub message: String,
}

/// `GET /greet/{name}`
///
/// An invalid name short-circuits with an [`ApiError`], which is a finalized
/// response and is returned as-is whatever the client accepts.
pub async fn greet(
    State(state): State<AppState>,
    preference: AcceptPreference,
    Path(name): Path<String>,
) -> Result<Response, NegotiationError> {
    state.greeting.respond(&preference, greeting_for(&name))
}

fn greeting_for(name: &str) -> Result<Mapping<Greeting>, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }

    Ok(Mapping(Greeting {
        name: name.to_string(),
        message: format!("Nice to meet you, {}.", name),
    }))
}
