//! HTTP handler modules for the haggle server.
//!
//! Page handlers only produce data or a finalized response. Choosing between
//! HTML and JSON happens in the negotiator they are wrapped with.

pub mod greetings;
pub mod pages;
