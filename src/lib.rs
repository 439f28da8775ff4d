// gh-publish library - commit, create the GitHub remote if needed, push
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod external;
pub mod fs;
pub mod git;
pub mod telemetry;
pub mod workflows;

// Re-export key types for easy access
pub use config::{ConfigOverrides, FileConfig, PublishConfig};
pub use error::PublishError;
pub use exit_code::ExitCode;
pub use external::{CommandExecutor, GitClient, GitHubClient, ProcessCommandExecutor, ToolFailure};
pub use fs::{FileSystemOperations, StandardFileSystem};
pub use git::{display_url, parse_github_url, GitHubRepoInfo};
pub use telemetry::{create_publish_span, generate_correlation_id, init_telemetry};
pub use workflows::{PublishOutcome, PublishWorkflow};
