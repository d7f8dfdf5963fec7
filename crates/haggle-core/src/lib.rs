//! Accept-header content negotiation for axum handlers.
//!
//! A handler wrapped by a [`Negotiator`] returns either a finalized response,
//! which is passed through untouched, or a mapping of variables. Mappings are
//! rendered as JSON when the client prefers `application/json` and through a
//! named template as HTML otherwise.

pub mod accept;
pub mod error;
pub mod negotiator;
pub mod result;
pub mod templates;

// Re-export commonly used types
pub use accept::{AcceptPreference, MediaRange, Representation};
pub use error::{NegotiationError, TemplateError};
pub use negotiator::{NegotiatedFuture, Negotiator};
pub use result::{Finalized, HandlerResult, IntoHandlerResult, Mapping};
pub use templates::{TemplateEngine, Templates};

// The engine behind `Templates`, for callers that need its error type.
pub use minijinja;
