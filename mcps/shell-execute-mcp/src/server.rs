//! MCP Server implementation for shell command execution
//!
//! The tool table is the `ToolRouter` built once in [`ShellExecuteServer::with_config`].
//! `tools/call` never answers with a protocol error: bad arguments and unknown
//! names come back as error-flagged tool results.

use std::path::PathBuf;

use mcp_common::{
    async_trait, tool_error, CallToolResult, EmbeddableError, EmbeddableMcp, EmbeddableResult,
    McpError, Tool,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParam, Implementation, JsonObject, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_router, RoleServer,
};
use serde_json::Value;

use crate::executor::CommandExecutor;
use crate::handlers::{self, EXECUTE_COMMAND};
use crate::params::ExecuteCommandParams;
use crate::types::Config;

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "SHELL_EXECUTE_CONFIG";

/// Name reported in the `initialize` handshake
pub const SERVER_NAME: &str = "mcp-shell-execute";

/// The Shell Execute MCP Server
#[derive(Clone)]
pub struct ShellExecuteServer {
    executor: CommandExecutor,
    config: Config,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl ShellExecuteServer {
    /// Create a new server, loading config from standard locations
    ///
    /// Config is searched in order:
    /// 1. `SHELL_EXECUTE_CONFIG` env var
    /// 2. `./shell-execute-mcp.toml`
    /// 3. `$XDG_CONFIG_HOME/shell-execute-mcp/config.toml`
    /// 4. Default config if none found
    pub fn new() -> Self {
        Self::with_config(Self::load_config())
    }

    /// Create a new server with explicit config
    pub fn with_config(config: Config) -> Self {
        Self {
            executor: CommandExecutor::new(&config),
            config,
            tool_router: Self::tool_router(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn load_config() -> Config {
        let mut candidates = Vec::new();

        if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                candidates.push(path);
            } else {
                tracing::warn!("{}={} does not exist", CONFIG_PATH_ENV, env_path);
            }
        }

        candidates.push(PathBuf::from("shell-execute-mcp.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("shell-execute-mcp").join("config.toml"));
        }

        for path in candidates.iter().filter(|p| p.exists()) {
            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Failed to read config {}: {}", path.display(), e);
                    continue;
                }
            };

            let config = match toml::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                    continue;
                }
            };

            match config.validate() {
                Ok(()) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => tracing::warn!("Ignoring config {}: {}", path.display(), e),
            }
        }

        tracing::info!("Using default configuration");
        Config::default()
    }

    #[tool(
        name = "execute.command",
        description = "Execute a shell command with optional timeout"
    )]
    async fn execute_command(
        &self,
        Parameters(params): Parameters<ExecuteCommandParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::execute_command(&self.executor, &self.config, params).await)
    }

    /// Route a raw tool call by name
    ///
    /// The `ToolRouter` only supplies the descriptor for listing; calls are
    /// matched here so argument errors become tool results.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        if name != EXECUTE_COMMAND {
            return handlers::unknown_tool(name);
        }

        let params = match handlers::parse_params(arguments) {
            Ok(params) => params,
            Err(rejected) => return rejected,
        };

        self.execute_command(Parameters(params))
            .await
            .unwrap_or_else(|e| tool_error(e.message.to_string()))
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

impl rmcp::ServerHandler for ShellExecuteServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Shell command execution MCP server. \
                 Use execute.command to run a command through the host shell; \
                 the result carries stdout, stderr and exitCode (0 or 1)."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_router.list_all()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = %request.name, "Tool call received");
        Ok(self.dispatch(&request.name, request.arguments).await)
    }
}

impl Default for ShellExecuteServer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for ShellExecuteServer {
    fn server_name(&self) -> &str {
        "shell-execute"
    }

    fn server_description(&self) -> Option<&str> {
        Some("Executes shell commands with a wall-clock timeout")
    }

    fn server_version(&self) -> Option<&str> {
        Some(env!("CARGO_PKG_VERSION"))
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        let arguments = match params {
            Value::Object(map) => Some(map),
            Value::Null => None,
            other => {
                return Err(EmbeddableError::InvalidParams(format!(
                    "expected a JSON object, got {}",
                    other
                )))
            }
        };
        Ok(self.dispatch(name, arguments).await)
    }
}

#[cfg(test)]
mod tests {
    use rmcp::model::RawContent;
    use serde_json::json;

    use super::*;
    use crate::types::CommandResult;

    fn server() -> ShellExecuteServer {
        ShellExecuteServer::with_config(Config::default())
    }

    fn text_of(result: &CallToolResult) -> &str {
        result
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                RawContent::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .next()
            .unwrap_or("")
    }

    #[test]
    fn test_embeddable_server_name() {
        assert_eq!(server().server_name(), "shell-execute");
    }

    #[test]
    fn test_single_tool_listed() {
        let tools = EmbeddableMcp::list_tools(&server());

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "execute.command");

        let schema = serde_json::to_value(tools[0].input_schema.as_ref()).unwrap();
        assert_eq!(schema["properties"]["command"]["type"], "string");
        let timeout = &schema["properties"]["timeoutMillis"];
        assert_eq!(timeout["default"], crate::types::DEFAULT_TIMEOUT_MS);
        assert_eq!(timeout["minimum"], 1);
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required, &vec![json!("command")]);
    }

    #[test]
    fn test_listing_is_idempotent() {
        let server = server();
        let first = serde_json::to_value(EmbeddableMcp::list_tools(&server)).unwrap();
        let second = serde_json::to_value(EmbeddableMcp::list_tools(&server)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_server_info_advertises_tools() {
        let info = rmcp::ServerHandler::get_info(&server());
        assert_eq!(info.server_info.name, SERVER_NAME);
        assert!(info.capabilities.tools.is_some());
    }

    #[tokio::test]
    async fn test_unknown_tool_names_the_tool() {
        let result = EmbeddableMcp::call_tool(&server(), "run_command", json!({ "command": "ls" }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("run_command"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unknown_tool_spawns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let command = format!("touch '{}'", marker.display());

        let result = server()
            .dispatch("execute.script", json!({ "command": command }).as_object().cloned())
            .await;

        assert_eq!(result.is_error, Some(true));
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_null_params_rejected() {
        let result = EmbeddableMcp::call_tool(&server(), EXECUTE_COMMAND, Value::Null)
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_non_object_params_rejected() {
        let result = EmbeddableMcp::call_tool(&server(), EXECUTE_COMMAND, json!("echo hi")).await;
        assert!(matches!(result, Err(EmbeddableError::InvalidParams(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_embeddable_echo() {
        let result = EmbeddableMcp::call_tool(
            &server(),
            EXECUTE_COMMAND,
            json!({ "command": "echo \"Hello, World!\"" }),
        )
        .await
        .unwrap();

        assert_ne!(result.is_error, Some(true));
        let parsed: CommandResult = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(parsed, CommandResult::success("Hello, World!\n".into(), String::new()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_configured_default_timeout_applies() {
        let mut config = Config::default();
        config.execution.default_timeout_ms = 100;
        let server = ShellExecuteServer::with_config(config);
        assert_eq!(server.config().execution.default_timeout_ms, 100);

        let result = server
            .dispatch(EXECUTE_COMMAND, json!({ "command": "sleep 5" }).as_object().cloned())
            .await;

        let parsed: CommandResult = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(parsed.stderr, "Command execution timed out");
    }
}
