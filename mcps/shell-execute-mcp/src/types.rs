//! Type definitions for shell execute MCP

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timeout applied when a call does not provide one
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Message reported in `stderr` when the timer wins the race
pub const TIMEOUT_MESSAGE: &str = "Command execution timed out";

// ============================================================================
// Configuration Types
// ============================================================================

/// Server configuration, normally absent (all defaults)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub execution: ExecutionConfig,
}

impl Config {
    /// Reject configs that would make every call fail
    pub fn validate(&self) -> Result<(), ExecError> {
        if self.execution.shell.trim().is_empty() {
            return Err(ExecError::Config("shell must not be empty".to_string()));
        }
        if self.execution.default_timeout_ms == 0 {
            return Err(ExecError::Config(
                "default_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Shell the command string is handed to
    #[serde(default = "default_shell")]
    pub shell: String,

    /// Flag telling the shell to read the command from the next argument
    #[serde(default = "default_shell_arg")]
    pub shell_arg: String,

    /// Timeout in milliseconds when the caller omits `timeoutMillis`
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,

    /// Kill the command (and its process group on Unix) when it times out.
    /// When false the subprocess is abandoned and keeps running.
    #[serde(default = "default_kill_on_timeout")]
    pub kill_on_timeout: bool,
}

#[cfg(unix)]
fn default_shell() -> String {
    "/bin/sh".to_string()
}

#[cfg(windows)]
fn default_shell() -> String {
    "cmd".to_string()
}

#[cfg(unix)]
fn default_shell_arg() -> String {
    "-c".to_string()
}

#[cfg(windows)]
fn default_shell_arg() -> String {
    "/C".to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_kill_on_timeout() -> bool {
    true
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            shell_arg: default_shell_arg(),
            default_timeout_ms: default_timeout_ms(),
            kill_on_timeout: default_kill_on_timeout(),
        }
    }
}

// ============================================================================
// Request / Result Types
// ============================================================================

/// One validated command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    command: String,
    timeout: Duration,
}

impl CommandRequest {
    /// Build a request, rejecting an empty command or a zero timeout
    pub fn new(command: impl Into<String>, timeout_ms: u64) -> Result<Self, ExecError> {
        let command = command.into();
        if command.trim().is_empty() {
            return Err(ExecError::InvalidArguments(
                "command must be a non-empty string".to_string(),
            ));
        }
        if timeout_ms == 0 {
            return Err(ExecError::InvalidArguments(
                "timeoutMillis must be a positive number".to_string(),
            ));
        }

        Ok(Self {
            command,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Normalized outcome of a single command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success(stdout: String, stderr: String) -> Self {
        Self {
            stdout,
            stderr,
            exit_code: 0,
        }
    }

    /// Failure shape: empty stdout, error text in stderr, exit code 1
    pub fn failure(err: &ExecError) -> Self {
        Self {
            stdout: String::new(),
            stderr: err.to_string(),
            exit_code: 1,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("{0}")]
    InvalidArguments(String),

    /// Non-zero exit. Carries the captured stderr when there was any,
    /// otherwise a generated description.
    #[error("{0}")]
    CommandFailed(String),

    #[error("Failed to spawn command: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}
