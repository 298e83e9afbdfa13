//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mcpgate_core::DispatchError;
use mcpgate_tools::StoreError;

use crate::dto::{ErrorResponse, ToolErrorResponse, ToolNotFoundResponse};

/// Application-level errors with HTTP status code mapping.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
    ToolNotFound { available_tools: Vec<String> },
    ToolFailed { tool: String, message: String },
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::NotFound { available_tools, .. } => AppError::ToolNotFound { available_tools },
            DispatchError::ExecutionFailed { tool, message } => AppError::ToolFailed { tool, message },
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Store error: {}", err);
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: msg })).into_response()
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: msg })).into_response()
            }
            AppError::ToolNotFound { available_tools } => (
                StatusCode::NOT_FOUND,
                Json(ToolNotFoundResponse {
                    error: "Tool not found".to_string(),
                    available_tools,
                }),
            )
                .into_response(),
            AppError::ToolFailed { tool, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ToolErrorResponse { error: message, tool }),
            )
                .into_response(),
        }
    }
}
