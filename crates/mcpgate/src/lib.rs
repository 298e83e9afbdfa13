//! # mcpgate — tool catalog and dispatcher
//!
//! mcpgate exposes a fixed catalog of named tools over HTTP and routes each
//! execution request to the matching handler by exact name.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mcpgate::prelude::*;
//!
//! let store = SqlStore::open("data/mcpgate.db")?;
//! let registry = ToolRegistry::with_defaults(store)?;
//!
//! for tool in registry.list() {
//!     println!("{}: {}", tool.name, tool.description);
//! }
//!
//! let output = registry
//!     .dispatch(ToolInvocation::new("query_database", json!({"query": "SELECT 1 AS x"})))
//!     .await?;
//! ```
//!
//! ## Crate Structure
//!
//! | Crate | Description |
//! |-------|-------------|
//! | [`mcpgate_config`] | Server configuration from env and JSON |
//! | [`mcpgate_core`] | Descriptors, invocations, dispatch errors |
//! | [`mcpgate_tools`] | Tool registry, SQL store, built-in tools |
//!
//! The HTTP server lives in the `mcpgate-server` binary.
//!
//! ## Built-in Tools
//!
//! - `query_database` — Executes SQL verbatim against the configured store
//! - `graph_api_request` — Placeholder that echoes `endpoint` and `method`

// Re-export config types
pub use mcpgate_config::{ConfigError, ServerConfig};

// Re-export core types
pub use mcpgate_core::{
    is_truthy, DispatchError, ParameterSpec, ToolDescriptor, ToolInvocation, ToolOutput,
};

// Re-export tools
pub use mcpgate_tools::{
    GraphApiRequestTool, QueryDatabaseTool, SqlStore, StoreError, Tool, ToolError, ToolRegistry,
};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use mcpgate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{DispatchError, ToolDescriptor, ToolInvocation, ToolOutput};
    pub use crate::{SqlStore, Tool, ToolError, ToolRegistry};
    pub use crate::ServerConfig;
}
