use crate::external::{GitError, GitHubError, ToolFailure};
use std::path::PathBuf;
use thiserror::Error;

/// Every way a publish run can stop short.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("{field} must be provided via arguments, environment variables or a config file")]
    ConfigurationMissing { field: &'static str },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidConfiguration {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Git repository not found at {}", .path.display())]
    NotARepository { path: PathBuf },

    #[error("failed to commit pending changes: {0}")]
    Commit(#[source] GitError),

    #[error("could not create the GitHub repository: {0}")]
    RemoteSetup(#[source] GitHubError),

    #[error("failed to push to origin: {0}")]
    Push(#[source] GitError),

    #[error("git command failed: {0}")]
    Tool(#[source] GitError),

    #[error("failed to write progress output: {0}")]
    Output(#[from] std::io::Error),
}

impl PublishError {
    /// The failed invocation, when the tool ran and exited non-zero.
    pub fn tool_failure(&self) -> Option<&ToolFailure> {
        match self {
            PublishError::Commit(err) | PublishError::Push(err) | PublishError::Tool(err) => {
                err.failure()
            }
            PublishError::RemoteSetup(err) => err.failure(),
            _ => None,
        }
    }
}
