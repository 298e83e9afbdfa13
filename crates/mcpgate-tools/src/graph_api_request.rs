use std::collections::BTreeMap;

use async_trait::async_trait;
use mcpgate_core::{is_truthy, ParameterSpec, ToolOutput};
use serde_json::{json, Value};

use crate::{Tool, ToolError};

const DEFAULT_METHOD: &str = "GET";

/// Placeholder for Microsoft Graph API calls.
///
/// Makes no network request; echoes the requested endpoint and method.
#[derive(Debug, Default)]
pub struct GraphApiRequestTool;

impl GraphApiRequestTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for GraphApiRequestTool {
    fn name(&self) -> &str {
        "graph_api_request"
    }

    fn description(&self) -> &str {
        "Make requests to Microsoft Graph API"
    }

    fn parameters(&self) -> BTreeMap<String, ParameterSpec> {
        BTreeMap::from([
            (
                "endpoint".to_string(),
                ParameterSpec::required("string", "Graph API endpoint path"),
            ),
            (
                "method".to_string(),
                ParameterSpec::optional("string", "HTTP method (GET, POST, etc.)"),
            ),
        ])
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError> {
        let mut output = ToolOutput::new().with("message", json!("Graph API endpoint placeholder"));

        // An absent endpoint is left out of the response entirely.
        if let Some(endpoint) = args.get("endpoint") {
            output = output.with("endpoint", endpoint.clone());
        }

        let method = args
            .get("method")
            .filter(|m| is_truthy(m))
            .cloned()
            .unwrap_or_else(|| json!(DEFAULT_METHOD));

        Ok(output.with("method", method))
    }
}
