//! Server configuration from environment variables.
//!
//! - `HAGGLE_BIND`: listen address (default: "0.0.0.0")
//! - `HAGGLE_PORT`: listen port (default: "3000")
//! - `HAGGLE_TEMPLATE_DIR`: directory to load templates from (default: the
//!   templates compiled into the binary)

use std::path::PathBuf;

use crate::error::ServerError;

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Runtime settings for the haggle server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub template_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            template_dir: None,
        }
    }
}

impl ServerConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, so tests need not touch the process
    /// environment. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind = get("HAGGLE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let port = match get("HAGGLE_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ServerError::InvalidConfig(format!("HAGGLE_PORT '{}' is not a valid port", raw)))?,
            None => DEFAULT_PORT,
        };
        let template_dir = get("HAGGLE_TEMPLATE_DIR").map(PathBuf::from);

        Ok(ServerConfig {
            bind,
            port,
            template_dir,
        })
    }

    /// The `host:port` string to bind.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
