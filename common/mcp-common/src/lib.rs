//! MCP Common - Shared utilities for MCP servers
//!
//! - **Initialization**: [`init_tracing`] and the `serve_stdio!` macro
//! - **Results**: [`json_success`] and [`tool_error`] for `CallToolResult`s
//! - **Embeddable**: [`EmbeddableMcp`] trait for in-process execution
//!
//! ```rust,ignore
//! // main.rs
//! mcp_common::serve_stdio!(MyServer, "my_mcp");
//!
//! // a tool body
//! json_success(&data)
//! ```

pub mod embeddable;
pub mod init;
pub mod result;

pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use init::{init_tracing, serve_stdio_server, LogFormat};
pub use result::{json_success, tool_error};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

pub use async_trait::async_trait;
