//! External tool abstractions
//!
//! This module provides trait-based abstractions for the GitHub CLI and Git,
//! enabling testable code through dependency injection and mock
//! implementations. Decision making in the publish workflow stays separate
//! from the impure effects of running external commands.

pub mod command;
pub mod git;
pub mod github;
#[cfg(test)]
pub mod testing;

pub use command::{CommandError, CommandExecutor, CommandOutput, ProcessCommandExecutor, ToolFailure};
pub use git::{GitClient, GitError, GitRepository};
pub use github::{GitHubClient, GitHubError, GitHubOperations, Visibility};
