//! Command executor - runs a shell command and races it against a timer
//!
//! Every failure mode ends up inside the returned [`CommandResult`]; the
//! executor itself never errors.

use std::process::{Output, Stdio};

use tokio::process::Command;

use crate::types::{CommandRequest, CommandResult, Config, ExecError};

/// Spawns one shell process per request
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    shell: String,
    shell_arg: String,
    kill_on_timeout: bool,
}

impl CommandExecutor {
    pub fn new(config: &Config) -> Self {
        Self {
            shell: config.execution.shell.clone(),
            shell_arg: config.execution.shell_arg.clone(),
            kill_on_timeout: config.execution.kill_on_timeout,
        }
    }

    /// Run the request to completion or until its timeout fires
    pub async fn execute(&self, request: &CommandRequest) -> CommandResult {
        match self.run(request).await {
            Ok(result) => result,
            Err(err) => CommandResult::failure(&err),
        }
    }

    async fn run(&self, request: &CommandRequest) -> Result<CommandResult, ExecError> {
        let mut std_cmd = std::process::Command::new(&self.shell);
        std_cmd
            .arg(&self.shell_arg)
            .arg(request.command())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Own process group so a timeout can take down grandchildren too
        #[cfg(unix)]
        if self.kill_on_timeout {
            use std::os::unix::process::CommandExt;
            std_cmd.process_group(0);
        }

        let mut cmd = Command::from(std_cmd);
        cmd.kill_on_drop(self.kill_on_timeout);

        tracing::debug!(
            command = request.command(),
            timeout_ms = request.timeout().as_millis() as u64,
            "Spawning command"
        );

        let child = cmd.spawn().map_err(ExecError::Spawn)?;
        let pid = child.id();

        match tokio::time::timeout(request.timeout(), child.wait_with_output()).await {
            Ok(output) => Ok(normalize(request.command(), output?)),
            Err(_elapsed) => {
                tracing::warn!(
                    command = request.command(),
                    timeout_ms = request.timeout().as_millis() as u64,
                    kill = self.kill_on_timeout,
                    "Command timed out"
                );
                if self.kill_on_timeout {
                    kill_process_group(pid);
                }
                Err(ExecError::Timeout)
            }
        }
    }
}

fn normalize(command: &str, output: Output) -> CommandResult {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    tracing::debug!(
        status = %output.status,
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "Command finished"
    );

    if output.status.success() {
        return CommandResult::success(stdout, stderr);
    }

    let description = if !stderr.trim().is_empty() {
        stderr
    } else {
        match output.status.code() {
            Some(code) => format!("Command failed with exit code {}: {}", code, command),
            None => format!("Command terminated by signal: {}", command),
        }
    };
    CommandResult::failure(&ExecError::CommandFailed(description))
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pid) = pid else {
        return;
    };
    // SAFETY: killpg only sends a signal; the group id is the child's pid
    // because it was spawned with process_group(0).
    let rc = unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) };
    if rc != 0 {
        tracing::debug!(
            pid,
            error = %std::io::Error::last_os_error(),
            "killpg failed"
        );
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {
    // The direct child is killed on drop; there is no group to signal.
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn executor() -> CommandExecutor {
        CommandExecutor::new(&Config::default())
    }

    fn request(command: &str, timeout_ms: u64) -> CommandRequest {
        CommandRequest::new(command, timeout_ms).unwrap()
    }

    #[tokio::test]
    async fn test_echo_round_trip() {
        let result = executor()
            .execute(&request("echo \"Hello, World!\"", 60_000))
            .await;

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "Hello, World!\n");
        assert_eq!(result.stderr, "");
    }

    #[tokio::test]
    async fn test_success_keeps_stderr() {
        let result = executor().execute(&request("echo warn 1>&2", 5_000)).await;

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stderr, "warn\n");
    }

    #[tokio::test]
    async fn test_shell_features_honored() {
        let result = executor()
            .execute(&request("printf 'b\\na\\n' | sort | head -n 1", 5_000))
            .await;

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "a\n");
    }

    #[tokio::test]
    async fn test_non_zero_exit_without_stderr() {
        let result = executor().execute(&request("exit 7", 5_000)).await;

        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stdout, "");
        assert!(result.stderr.contains("exit code 7"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_uses_captured_stderr() {
        let result = executor()
            .execute(&request("echo partial; echo boom 1>&2; exit 3", 5_000))
            .await;

        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, "boom\n");
    }

    #[tokio::test]
    async fn test_timeout_resolves_early() {
        let start = Instant::now();
        let result = executor().execute(&request("sleep 5", 100)).await;

        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, "Command execution timed out");
    }

    #[tokio::test]
    async fn test_timeout_kills_process_group() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("late-marker");
        let command = format!("sleep 1 && touch '{}'", marker.display());

        let result = executor().execute(&request(&command, 100)).await;
        assert_eq!(result.stderr, "Command execution timed out");

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists(), "timed-out command kept running");
    }

    #[tokio::test]
    async fn test_spawn_failure_reported() {
        let mut config = Config::default();
        config.execution.shell = "/nonexistent/shell-for-test".to_string();
        let result = CommandExecutor::new(&config)
            .execute(&request("echo hi", 1_000))
            .await;

        assert_eq!(result.exit_code, 1);
        assert!(result.stderr.starts_with("Failed to spawn command"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_lossy() {
        let result = executor().execute(&request("printf '\\377ok'", 5_000)).await;

        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.ends_with("ok"));
        assert!(result.stdout.contains('\u{FFFD}'));
    }
}
