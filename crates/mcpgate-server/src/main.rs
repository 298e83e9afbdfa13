//! HTTP server entry point.
//!
//! Loads configuration, opens the shared store, registers the built-in
//! tools and serves the Axum router.

mod app;
mod dto;
mod error;
mod handlers;

use std::sync::Arc;

use anyhow::{Context, Result};
use mcpgate_config::ServerConfig;
use mcpgate_tools::{SqlStore, ToolRegistry};
use tracing::{info, warn};

/// Shared server state accessible from all handlers.
pub struct ServerState {
    pub store: SqlStore,
    pub registry: ToolRegistry,
}

impl ServerState {
    /// Builds the state with the built-in tools bound to `store`.
    pub fn new(store: SqlStore) -> Result<Self> {
        let registry = ToolRegistry::with_defaults(store.clone())?;
        Ok(Self { store, registry })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let state = Arc::new(init_server_state(&config)?);
    let app = app::router(state);

    let addr = config.bind_addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Opens the store and registers tools.
fn init_server_state(config: &ServerConfig) -> Result<ServerState> {
    let store = SqlStore::open(&config.database_url).context("failed to open database")?;

    if config.database_read_only {
        store.set_read_only(true)?;
        info!("Database opened read-only");
    } else {
        warn!("query_database executes caller-supplied SQL verbatim with full connection privileges");
    }

    let state = ServerState::new(store)?;
    info!("Registered {} tools", state.registry.len());
    for name in state.registry.tool_names() {
        info!("  - {}", name);
    }

    Ok(state)
}
