//! Shell Execute MCP Library
//!
//! Exposes a single `execute.command` tool that runs a command string
//! through the host shell and races it against a timeout. Command failures
//! are reported inside the result (`exitCode: 1`), never as protocol errors.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//! use shell_execute_mcp::ShellExecuteServer;
//!
//! let server = ShellExecuteServer::new();
//! let result = server
//!     .call_tool("execute.command", serde_json::json!({ "command": "echo hi" }))
//!     .await?;
//! ```

pub mod executor;
pub mod handlers;
pub mod params;
pub mod server;
pub mod types;

pub use executor::CommandExecutor;
pub use server::ShellExecuteServer;
pub use types::{CommandRequest, CommandResult, Config, ExecError};

pub use params::*;
