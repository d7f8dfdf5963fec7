//! Application state shared by all routes.
//!
//! [`AppState`] holds the read-only template store and the negotiators built
//! from it. Everything inside is immutable and `Arc`-backed, so cloning per
//! request is cheap and no locking is needed.

use haggle_core::{Negotiator, Templates};

use crate::config::ServerConfig;
use crate::error::ServerError;

/// Template rendered by the `/async`, `/sync` and `/normal` routes.
pub const EXAMPLE_TEMPLATE: &str = "example.template";
/// Template rendered by `/greet/{name}`.
pub const GREETING_TEMPLATE: &str = "greeting.html";

const REQUIRED_TEMPLATES: [&str; 2] = [EXAMPLE_TEMPLATE, GREETING_TEMPLATE];

/// Shared application state for the HTTP server.
#[derive(Clone, Debug)]
pub struct AppState {
    pub templates: Templates,
    /// Negotiator for the greeting page, used by handlers that need
    /// extractors and call `respond` directly.
    pub greeting: Negotiator,
}

impl AppState {
    /// Creates state from configuration. A configured template directory must
    /// provide every template the routes render.
    pub fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        let Some(dir) = &config.template_dir else {
            return Self::builtin();
        };

        let templates = Templates::from_dir(dir);
        for name in REQUIRED_TEMPLATES {
            if !templates.contains(name) {
                return Err(ServerError::MissingTemplate {
                    name: name.to_string(),
                    dir: dir.display().to_string(),
                });
            }
        }
        tracing::info!(dir = %dir.display(), "loaded templates from directory");
        Ok(Self::with_templates(templates))
    }

    /// Creates state backed by the templates compiled into the binary.
    pub fn builtin() -> Result<Self, ServerError> {
        let templates = Templates::from_sources([
            (EXAMPLE_TEMPLATE, include_str!("../templates/example.template")),
            (GREETING_TEMPLATE, include_str!("../templates/greeting.html")),
        ])?;
        Ok(Self::with_templates(templates))
    }

    /// Creates state around an already loaded template store.
    pub fn with_templates(templates: Templates) -> Self {
        let greeting = templates.negotiate(GREETING_TEMPLATE);
        AppState {
            templates,
            greeting,
        }
    }
}
