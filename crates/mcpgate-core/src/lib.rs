//! Core domain types and error definitions for mcpgate.
//!
//! This crate provides the types shared between the tool registry and the
//! HTTP server:
//!
//! - [`ToolDescriptor`] and [`ParameterSpec`] — Catalog entries advertised for discovery
//! - [`ToolInvocation`] — A named call with its arguments
//! - [`ToolOutput`] — Fields a tool contributes to a successful response
//! - [`DispatchError`] — Why a dispatch did not succeed
//!
//! # Example
//!
//! ```rust
//! use mcpgate_core::{ParameterSpec, ToolDescriptor};
//!
//! let descriptor = ToolDescriptor::new("query_database", "Execute SQL queries")
//!     .param("query", ParameterSpec::required("string", "SQL query to execute"));
//!
//! assert_eq!(descriptor.parameters.len(), 1);
//! assert!(descriptor.parameters["query"].required);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that end a dispatch without a successful tool output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// No tool is registered under the requested name.
    #[error("Tool not found: {tool}")]
    NotFound {
        tool: String,
        /// Every registered tool name, in catalog order.
        available_tools: Vec<String>,
    },

    /// The tool was found but its handler failed.
    #[error("{message}")]
    ExecutionFailed { tool: String, message: String },
}

impl DispatchError {
    /// Name of the tool the caller asked for.
    pub fn tool(&self) -> &str {
        match self {
            DispatchError::NotFound { tool, .. } => tool,
            DispatchError::ExecutionFailed { tool, .. } => tool,
        }
    }
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Descriptive metadata for one tool parameter.
///
/// Never enforced against invocation arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Informal type tag, e.g. `"string"`.
    #[serde(rename = "type")]
    pub param_type: String,
    /// Human-readable description of the parameter.
    pub description: String,
    /// Whether callers are expected to supply the parameter.
    pub required: bool,
}

impl ParameterSpec {
    /// Creates a parameter callers are expected to supply.
    pub fn required(param_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            param_type: param_type.into(),
            description: description.into(),
            required: true,
        }
    }

    /// Creates a parameter callers may leave out.
    pub fn optional(param_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            param_type: param_type.into(),
            description: description.into(),
            required: false,
        }
    }
}

/// A catalog entry describing one tool for discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique name of the tool (e.g., "query_database").
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// Parameter name to its descriptive spec.
    pub parameters: BTreeMap<String, ParameterSpec>,
}

impl ToolDescriptor {
    /// Creates a descriptor with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Adds a parameter to the descriptor.
    pub fn param(mut self, name: impl Into<String>, spec: ParameterSpec) -> Self {
        self.parameters.insert(name.into(), spec);
        self
    }
}

// ============================================================================
// Invocation Types
// ============================================================================

/// A request to run one tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    /// Name of the tool to execute.
    pub tool_name: String,
    /// Arguments handed to the tool as-is.
    pub arguments: Value,
}

impl ToolInvocation {
    pub fn new(tool_name: impl Into<String>, arguments: Value) -> Self {
        Self { tool_name: tool_name.into(), arguments }
    }

    /// Builds an invocation from a request body.
    ///
    /// A truthy `arguments` field wins; otherwise the whole body is the
    /// argument object.
    pub fn from_body(tool_name: impl Into<String>, body: Value) -> Self {
        let arguments = match body.get("arguments") {
            Some(args) if is_truthy(args) => args.clone(),
            _ => body,
        };
        Self::new(tool_name, arguments)
    }
}

/// Fields a tool contributes to a successful response.
///
/// The server emits them next to `"success": true`, so `success` is a
/// reserved key and is never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ToolOutput(Map<String, Value>);

impl ToolOutput {
    /// Key owned by the response envelope.
    pub const RESERVED_KEY: &'static str = "success";

    /// Creates an empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an output carrying a single `result` field.
    pub fn result(value: Value) -> Self {
        Self::new().with("result", value)
    }

    /// Adds a field, replacing any previous value under the same key.
    ///
    /// A field named [`ToolOutput::RESERVED_KEY`] is dropped.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != Self::RESERVED_KEY {
            self.0.insert(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

/// Loose truthiness for JSON values: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
