//! Git command abstractions
//!
//! Provides trait-based abstractions for Git operations, enabling testable
//! Git integrations through dependency injection.

use super::command::{CommandError, CommandExecutor, ToolFailure};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub type BranchName = String;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("Repository not found or not a git repository")]
    RepositoryNotFound(ToolFailure),
    #[error("HEAD is detached")]
    DetachedHead,
    #[error("Command execution error: {source}")]
    CommandError {
        #[from]
        source: CommandError,
    },
    #[error(transparent)]
    GitCommandFailed(ToolFailure),
}

impl GitError {
    /// Raw diagnostic text from the failed invocation.
    pub fn detail(&self) -> String {
        match self {
            GitError::RepositoryNotFound(failure) | GitError::GitCommandFailed(failure) => {
                failure.stderr.trim().to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn failure(&self) -> Option<&ToolFailure> {
        match self {
            GitError::RepositoryNotFound(failure) | GitError::GitCommandFailed(failure) => {
                Some(failure)
            }
            _ => None,
        }
    }
}

/// Trait for Git repository operations
///
/// This abstraction enables testing Git operations without actual repository
/// manipulation, while preserving the exact interface used by the application.
#[async_trait]
pub trait GitRepository: Send + Sync {
    /// Raw `git status --porcelain` output
    async fn status_porcelain(&self) -> Result<String, GitError>;

    /// Whether the working tree has modified or untracked entries
    async fn has_pending_changes(&self) -> Result<bool, GitError> {
        Ok(!self.status_porcelain().await?.trim().is_empty())
    }

    /// Stage every change in the working tree
    async fn stage_all(&self) -> Result<(), GitError>;

    /// Create a commit with the given message
    async fn commit(&self, message: &str) -> Result<(), GitError>;

    /// Names of configured remotes
    async fn remotes(&self) -> Result<Vec<String>, GitError>;

    /// Get the current branch name
    async fn current_branch(&self) -> Result<BranchName, GitError>;

    /// Rename the current branch in place (`git branch -M`)
    async fn rename_current_branch(&self, new_name: &str) -> Result<(), GitError>;

    /// Push a branch and set it as upstream
    async fn push_upstream(&self, remote: &str, branch: &str) -> Result<(), GitError>;

    /// URL configured for a remote
    async fn remote_url(&self, remote: &str) -> Result<String, GitError>;
}

/// Real Git implementation
pub struct GitClient {
    executor: Arc<dyn CommandExecutor>,
    workdir: PathBuf,
}

impl GitClient {
    pub fn new(executor: Arc<dyn CommandExecutor>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            workdir: workdir.into(),
        }
    }

    async fn execute_git_command(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.executor.execute("git", args, &self.workdir).await?;

        if !output.success() {
            return Err(self.classify_git_error(ToolFailure::from_output("git", args, &output)));
        }

        Ok(output.stdout.trim().to_string())
    }

    fn classify_git_error(&self, failure: ToolFailure) -> GitError {
        if failure.stderr.contains("not a git repository") {
            GitError::RepositoryNotFound(failure)
        } else {
            GitError::GitCommandFailed(failure)
        }
    }
}

#[async_trait]
impl GitRepository for GitClient {
    async fn status_porcelain(&self) -> Result<String, GitError> {
        self.execute_git_command(&["status", "--porcelain"]).await
    }

    async fn stage_all(&self) -> Result<(), GitError> {
        self.execute_git_command(&["add", "."]).await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        self.execute_git_command(&["commit", "-m", message]).await?;
        Ok(())
    }

    async fn remotes(&self) -> Result<Vec<String>, GitError> {
        let output = self.execute_git_command(&["remote"]).await?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn current_branch(&self) -> Result<BranchName, GitError> {
        // Try the newer command first
        if let Ok(branch) = self.execute_git_command(&["branch", "--show-current"]).await {
            if !branch.is_empty() {
                return Ok(branch);
            }
        }

        // Fallback to the older method
        let output = self
            .execute_git_command(&["rev-parse", "--abbrev-ref", "HEAD"])
            .await?;

        if output == "HEAD" {
            return Err(GitError::DetachedHead);
        }

        Ok(output)
    }

    async fn rename_current_branch(&self, new_name: &str) -> Result<(), GitError> {
        self.execute_git_command(&["branch", "-M", new_name]).await?;
        Ok(())
    }

    async fn push_upstream(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        self.execute_git_command(&["push", "-u", remote, branch]).await?;
        Ok(())
    }

    async fn remote_url(&self, remote: &str) -> Result<String, GitError> {
        self.execute_git_command(&["remote", "get-url", remote]).await
    }
}
