//! Demo HTTP server for accept-header content negotiation.
//!
//! Serves the same data as HTML or JSON depending on the client's `Accept`
//! header. This crate contains configuration, application state, error
//! handling, handlers and route definitions.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
