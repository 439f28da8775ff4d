//! GitHub CLI abstractions
//!
//! Provides trait-based abstractions for GitHub operations, enabling testable
//! GitHub integrations through dependency injection.

use super::command::{CommandError, CommandExecutor, ToolFailure};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    fn flag(self) -> &'static str {
        match self {
            Visibility::Public => "--public",
            Visibility::Private => "--private",
        }
    }
}

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub authentication failed")]
    AuthenticationFailed(ToolFailure),
    #[error("Repository already exists on GitHub")]
    RepositoryExists(ToolFailure),
    #[error("Network error: {}", .0.stderr.trim())]
    NetworkError(ToolFailure),
    #[error("Command execution error: {source}")]
    CommandError {
        #[from]
        source: CommandError,
    },
    #[error(transparent)]
    GhCommandFailed(ToolFailure),
    #[error("Invalid response from GitHub CLI: {message}")]
    InvalidResponse { message: String },
}

impl GitHubError {
    /// Raw diagnostic text from the failed invocation.
    pub fn detail(&self) -> String {
        match self.failure() {
            Some(failure) => failure.stderr.trim().to_string(),
            None => self.to_string(),
        }
    }

    pub fn failure(&self) -> Option<&ToolFailure> {
        match self {
            GitHubError::AuthenticationFailed(failure)
            | GitHubError::RepositoryExists(failure)
            | GitHubError::NetworkError(failure)
            | GitHubError::GhCommandFailed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Trait for GitHub operations
///
/// This abstraction enables testing GitHub integrations without actual
/// GitHub API calls, while preserving the exact interface used by the
/// application code.
#[async_trait]
pub trait GitHubOperations: Send + Sync {
    /// Create a hosted repository from the local one, wire it up as
    /// `remote` and push the current branch in the same call.
    ///
    /// Returns whatever `gh` printed, normally the new repository URL.
    async fn create_repository(
        &self,
        name: &str,
        visibility: Visibility,
        remote: &str,
    ) -> Result<String, GitHubError>;

    /// Login of the authenticated GitHub user
    async fn authenticated_login(&self) -> Result<String, GitHubError>;
}

/// Real GitHub CLI implementation
pub struct GitHubClient {
    executor: Arc<dyn CommandExecutor>,
    workdir: PathBuf,
}

impl GitHubClient {
    pub fn new(executor: Arc<dyn CommandExecutor>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            workdir: workdir.into(),
        }
    }

    async fn execute_gh_command(&self, args: &[&str]) -> Result<String, GitHubError> {
        let output = self.executor.execute("gh", args, &self.workdir).await?;

        if !output.success() {
            return Err(self.classify_gh_error(ToolFailure::from_output("gh", args, &output)));
        }

        Ok(output.stdout)
    }

    fn classify_gh_error(&self, failure: ToolFailure) -> GitHubError {
        let stderr = failure.stderr.to_lowercase();
        if stderr.contains("authentication failed")
            || stderr.contains("not logged in")
            || stderr.contains("gh auth login")
        {
            GitHubError::AuthenticationFailed(failure)
        } else if stderr.contains("name already exists") || stderr.contains("already exists") {
            GitHubError::RepositoryExists(failure)
        } else if stderr.contains("could not resolve host") || stderr.contains("connection") {
            GitHubError::NetworkError(failure)
        } else {
            GitHubError::GhCommandFailed(failure)
        }
    }
}

#[async_trait]
impl GitHubOperations for GitHubClient {
    async fn create_repository(
        &self,
        name: &str,
        visibility: Visibility,
        remote: &str,
    ) -> Result<String, GitHubError> {
        let remote_flag = format!("--remote={remote}");
        // The name goes after `--` so gh never reads it as a flag
        let args: [&str; 8] = [
            "repo",
            "create",
            visibility.flag(),
            "--source=.",
            &remote_flag,
            "--push",
            "--",
            name,
        ];

        let output = self.execute_gh_command(&args).await?;
        Ok(output.trim().to_string())
    }

    async fn authenticated_login(&self) -> Result<String, GitHubError> {
        let output = self
            .execute_gh_command(&["api", "user", "--jq", ".login"])
            .await?;
        let login = output.trim();

        if login.is_empty() {
            return Err(GitHubError::InvalidResponse {
                message: "empty login returned by `gh api user`".to_string(),
            });
        }

        Ok(login.to_string())
    }
}
