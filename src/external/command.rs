//! Base command execution abstraction
//!
//! Provides the foundational trait for executing external commands, enabling
//! dependency injection for testing. Commands are always spawned from an
//! argument vector; nothing is ever passed through a shell.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == 0
    }
}

#[derive(Debug, Error, Clone)]
pub enum CommandError {
    #[error("Command not found: {command}")]
    CommandNotFound { command: String },
    #[error("IO error: {message}")]
    Io { message: String },
}

/// Failure payload of a tool invocation that ran but exited non-zero.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("`{tool} {}` failed (exit code {exit_code}): {}", .args.join(" "), .stderr.trim())]
pub struct ToolFailure {
    pub tool: String,
    pub args: Vec<String>,
    pub exit_code: i32,
    pub stderr: String,
}

impl ToolFailure {
    pub fn from_output(tool: &str, args: &[&str], output: &CommandOutput) -> Self {
        Self {
            tool: tool.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            exit_code: output.status_code,
            stderr: output.stderr.clone(),
        }
    }

    /// The command line as the user would type it.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.tool.clone()
        } else {
            format!("{} {}", self.tool, self.args.join(" "))
        }
    }
}

/// Trait for executing external commands
///
/// This abstraction allows the rest of the codebase to execute commands
/// without directly depending on tokio::process::Command, enabling testing
/// with mock implementations.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> Result<CommandOutput, CommandError>;
}

/// Real implementation using tokio::process::Command
pub struct ProcessCommandExecutor;

#[async_trait]
impl CommandExecutor for ProcessCommandExecutor {
    async fn execute(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> Result<CommandOutput, CommandError> {
        tracing::debug!(program, ?args, cwd = %cwd.display(), "spawning command");

        let output = tokio::process::Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CommandError::CommandNotFound {
                        command: program.to_string(),
                    }
                } else {
                    CommandError::Io {
                        message: e.to_string(),
                    }
                }
            })?;

        let output = CommandOutput {
            status_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        tracing::debug!(program, status = output.status_code, "command finished");
        if output.success() && !output.stdout.trim().is_empty() {
            tracing::info!(program, stdout = %output.stdout.trim(), "command output");
        }

        Ok(output)
    }
}
