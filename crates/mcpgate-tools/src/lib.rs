//! Tool registry, dispatcher and built-in tools for mcpgate.
//!
//! This crate binds every tool's catalog descriptor to its handler in one
//! place:
//!
//! - [`Tool`] — Trait for implementing tools
//! - [`ToolRegistry`] — Ordered catalog and name-based dispatcher
//! - [`SqlStore`] — Shared database handle injected into tools that need it
//! - [`QueryDatabaseTool`] — Runs SQL statements verbatim
//! - [`GraphApiRequestTool`] — Placeholder that echoes its request
//!
//! # Implementing a Custom Tool
//!
//! ```rust,ignore
//! use std::collections::BTreeMap;
//! use async_trait::async_trait;
//! use mcpgate_core::{ParameterSpec, ToolOutput};
//! use mcpgate_tools::{Tool, ToolError};
//!
//! struct EchoTool;
//!
//! #[async_trait]
//! impl Tool for EchoTool {
//!     fn name(&self) -> &str { "echo" }
//!     fn description(&self) -> &str { "Returns its arguments" }
//!     fn parameters(&self) -> BTreeMap<String, ParameterSpec> { BTreeMap::new() }
//!     async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError> {
//!         Ok(ToolOutput::result(args))
//!     }
//! }
//! ```
//!
//! # Using the Registry
//!
//! ```rust,ignore
//! use mcpgate_tools::{SqlStore, ToolRegistry};
//!
//! let registry = ToolRegistry::with_defaults(SqlStore::open("data/mcpgate.db")?)?;
//! let output = registry.dispatch(ToolInvocation::new("query_database", args)).await?;
//! ```

mod graph_api_request;
mod query_database;
mod store;

pub use graph_api_request::GraphApiRequestTool;
pub use query_database::QueryDatabaseTool;
pub use store::{SqlStore, StoreError};

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

pub use mcpgate_core::{DispatchError, ParameterSpec, ToolDescriptor, ToolInvocation, ToolOutput};

/// Errors that can occur while registering or executing a tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool execution failed with a message.
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    /// Invalid arguments were passed to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The data store rejected or failed the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A tool with the same name is already registered.
    #[error("Tool already registered: {0}")]
    AlreadyRegistered(String),
}

/// A named operation exposed for discovery and invocation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique name of this tool.
    fn name(&self) -> &str;

    /// Returns a description of what this tool does.
    fn description(&self) -> &str;

    /// Returns the descriptive parameter specs. Never enforced.
    fn parameters(&self) -> BTreeMap<String, ParameterSpec>;

    /// Executes the tool with the given arguments.
    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError>;

    /// Builds the catalog entry for this tool.
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Catalog and dispatcher over one table of tools.
///
/// Tools keep their registration order; names are unique.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Creates an empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in tools, in catalog order:
    ///
    /// - `query_database` — backed by `store`
    /// - `graph_api_request`
    pub fn with_defaults(store: SqlStore) -> Result<Self, ToolError> {
        let mut registry = Self::new();
        registry.register(QueryDatabaseTool::new(store))?;
        registry.register(GraphApiRequestTool::new())?;
        Ok(registry)
    }

    /// Registers a tool at the end of the catalog.
    ///
    /// Fails without changing the registry if the name is taken.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolError::AlreadyRegistered(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(Arc::new(tool));
        Ok(())
    }

    /// Gets a tool by exact name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// Returns descriptors for all registered tools in registration order.
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    /// Returns true if a tool with the given name is registered.
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the names of all registered tools in registration order.
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Runs the named tool.
    ///
    /// Arguments go to the handler untouched. Handler errors come back as
    /// [`DispatchError::ExecutionFailed`] and never escape as panics or raw
    /// tool errors.
    pub async fn dispatch(&self, invocation: ToolInvocation) -> Result<ToolOutput, DispatchError> {
        let ToolInvocation { tool_name, arguments } = invocation;

        let Some(tool) = self.get(&tool_name) else {
            debug!(tool = %tool_name, "Unknown tool requested");
            return Err(DispatchError::NotFound {
                tool: tool_name,
                available_tools: self.tool_names(),
            });
        };

        tool.execute(arguments).await.map_err(|e| {
            error!("Error executing {}: {}", tool_name, e);
            DispatchError::ExecutionFailed {
                tool: tool_name.clone(),
                message: e.to_string(),
            }
        })
    }
}
