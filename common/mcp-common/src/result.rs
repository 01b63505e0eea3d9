//! Result helpers for MCP tool responses
//!
//! Two shapes exist: a normal result carrying text content, and an
//! error-flagged result (`isError: true`) for calls that violated the tool
//! contract.

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;

/// Successful response holding `data` as pretty-printed JSON text
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Error-flagged response with an `Error: ` prefixed message
///
/// The call itself still succeeds at the JSON-RPC level; clients read the
/// `isError` flag.
pub fn tool_error(message: impl AsRef<str>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {}", message.as_ref()))])
}
