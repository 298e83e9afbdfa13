//! Tool catalog and execution HTTP handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use mcpgate_core::ToolInvocation;
use serde_json::{Map, Value};
use tracing::info;

use crate::dto::{ToolListResponse, ToolSuccessResponse};
use crate::error::AppError;
use crate::ServerState;

/// Lists all available tools in catalog order.
pub async fn list(State(state): State<Arc<ServerState>>) -> Json<ToolListResponse> {
    Json(ToolListResponse {
        tools: state.registry.list(),
    })
}

/// Executes the named tool.
///
/// The body is `{"arguments": {...}}` or a bare argument object; an empty
/// body counts as `{}`.
pub async fn execute(
    State(state): State<Arc<ServerState>>,
    Path(tool_name): Path<String>,
    body: Bytes,
) -> Result<Json<ToolSuccessResponse>, AppError> {
    let body = parse_body(&body)?;
    info!("Executing tool: {}", tool_name);

    let output = state
        .registry
        .dispatch(ToolInvocation::from_body(tool_name, body))
        .await?;

    Ok(Json(ToolSuccessResponse { success: true, output }))
}

fn parse_body(bytes: &[u8]) -> Result<Value, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes).map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))
}
