//! HTTP route handlers for the gateway.

pub mod tools;

use std::sync::Arc;

use axum::extract::State;

use crate::error::AppError;
use crate::ServerState;

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// Database connectivity check: reports the time as seen by the store.
pub async fn root(State(state): State<Arc<ServerState>>) -> Result<String, AppError> {
    let now = state.store.now().await?;
    Ok(format!("Hello, World! The time from the DB is {}", now))
}
