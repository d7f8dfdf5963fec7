//! Router assembly for the haggle server.
//!
//! [`build_router`] wires the negotiated pages to their routes with CORS and
//! tracing middleware layers.

use axum::routing::{any, get};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::{AppState, EXAMPLE_TEMPLATE};

/// Builds the complete axum router.
///
/// The page routes accept any method. Unknown paths get a JSON 404.
pub fn build_router(state: AppState) -> Router {
    let example = state.templates.negotiate(EXAMPLE_TEMPLATE);

    Router::new()
        .route("/async", any(example.clone().wrap(handlers::pages::async_page)))
        .route("/sync", any(example.clone().wrap_sync(handlers::pages::sync_page)))
        .route("/normal", any(example.wrap_sync(handlers::pages::normal_page)))
        .route("/greet/{name}", get(handlers::greetings::greet))
        .fallback(handlers::pages::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
