//! Binary entrypoint for the haggle HTTP server.
//!
//! Configuration is read from environment variables, see
//! [`haggle_server::config`]. Log verbosity follows `RUST_LOG`.

use haggle_server::config::ServerConfig;
use haggle_server::error::ServerError;
use haggle_server::router::build_router;
use haggle_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let state = AppState::new(&config)?;
    let app = build_router(state);

    let addr = config.addr();
    tracing::info!("haggle server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
