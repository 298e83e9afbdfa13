//! Data transfer objects for HTTP message serialization.

use mcpgate_core::{ToolDescriptor, ToolOutput};
use serde::Serialize;

/// Response from the tool listing endpoint.
#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolDescriptor>,
}

/// Response from a successful tool execution.
///
/// Tool output fields sit next to `success`.
#[derive(Debug, Serialize)]
pub struct ToolSuccessResponse {
    pub success: bool,
    #[serde(flatten)]
    pub output: ToolOutput,
}

/// Response when the requested tool does not exist.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolNotFoundResponse {
    pub error: String,
    pub available_tools: Vec<String>,
}

/// Response when a tool's handler failed.
#[derive(Debug, Serialize)]
pub struct ToolErrorResponse {
    pub error: String,
    pub tool: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_key_is_written_once() {
        let body = ToolSuccessResponse {
            success: true,
            output: ToolOutput::result(json!([])).with("success", json!(false)),
        };
        let text = serde_json::to_string(&body).unwrap();
        assert_eq!(text, r#"{"success":true,"result":[]}"#);
    }
}
