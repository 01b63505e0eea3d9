//! Tool call handlers
//!
//! Argument problems and unknown tool names are reported as error-flagged
//! tool results. Command failures are normal results with `exitCode: 1`.

use mcp_common::{json_success, tool_error, CallToolResult};
use rmcp::model::JsonObject;

use crate::executor::CommandExecutor;
use crate::params::ExecuteCommandParams;
use crate::types::{CommandRequest, Config};

/// Name the single tool is registered under
pub const EXECUTE_COMMAND: &str = "execute.command";

/// Error result for any tool name other than [`EXECUTE_COMMAND`]
pub fn unknown_tool(name: &str) -> CallToolResult {
    tracing::warn!(tool = name, "Unknown tool requested");
    tool_error(format!("Unknown tool: {}", name))
}

/// Deserialize raw call arguments; a missing object counts as empty
pub fn parse_params(
    arguments: Option<JsonObject>,
) -> Result<ExecuteCommandParams, CallToolResult> {
    let arguments = serde_json::Value::Object(arguments.unwrap_or_default());
    serde_json::from_value(arguments).map_err(|e| invalid_arguments(&e.to_string()))
}

pub async fn execute_command(
    executor: &CommandExecutor,
    config: &Config,
    params: ExecuteCommandParams,
) -> CallToolResult {
    let timeout_ms = params
        .timeout_millis
        .unwrap_or(config.execution.default_timeout_ms);

    let request = match CommandRequest::new(params.command, timeout_ms) {
        Ok(request) => request,
        Err(e) => return invalid_arguments(&e.to_string()),
    };

    let result = executor.execute(&request).await;
    if !result.is_success() {
        tracing::info!(
            command = request.command(),
            stderr = %result.stderr,
            "Command did not succeed"
        );
    }

    json_success(&result).unwrap_or_else(|e| tool_error(e.message.to_string()))
}

fn invalid_arguments(detail: &str) -> CallToolResult {
    tracing::warn!(detail, "Rejected {} arguments", EXECUTE_COMMAND);
    tool_error(format!("Invalid arguments for {}: {}", EXECUTE_COMMAND, detail))
}
