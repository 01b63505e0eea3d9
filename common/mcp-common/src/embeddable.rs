//! Embeddable MCP trait for in-process execution
//!
//! [`EmbeddableMcp`] lets a host (or a test) list and call a server's tools
//! directly, without a transport in between.
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//! use shell_execute_mcp::ShellExecuteServer;
//!
//! let server = ShellExecuteServer::new();
//! let tools = server.list_tools();
//! let result = server
//!     .call_tool("execute.command", serde_json::json!({ "command": "uname" }))
//!     .await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Error type for embeddable MCP operations
///
/// Only failures of the in-process call itself land here. Tool-level
/// problems are reported through `CallToolResult::is_error`.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    /// Parameters could not be turned into a tool arguments object
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

/// Result type for embeddable MCP operations
pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// MCP server callable in-process
///
/// Implementations must be `Send + Sync` so calls can run from any task.
/// `list_tools` has to be free of side effects: calling it repeatedly
/// returns the same descriptors.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Server name for identification
    fn server_name(&self) -> &str;

    /// All tools with name, description and input schema
    fn list_tools(&self) -> Vec<Tool>;

    /// Run a tool by name with a JSON object of arguments
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    fn server_description(&self) -> Option<&str> {
        None
    }

    fn server_version(&self) -> Option<&str> {
        None
    }
}
