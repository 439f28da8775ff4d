use crate::config::ConfigOverrides;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gh-publish")]
#[command(about = "Commit local changes and publish the repository to GitHub")]
#[command(long_about = "gh-publish commits any pending changes with a timestamped message, \
                       creates the GitHub repository with the gh CLI when no 'origin' remote exists, \
                       renames the current branch to 'main' and pushes it. Re-run it to resume after a failure.")]
pub struct Cli {
    /// Path to the local repository
    #[arg(long, env = "REPO_PATH", value_name = "PATH", help = "Path to the local repository. Can be set via REPO_PATH env var")]
    pub repo_path: Option<PathBuf>,

    /// Name of the GitHub repository
    #[arg(long, env = "REPO_NAME", value_name = "NAME", help = "Name of the GitHub repository. Can be set via REPO_NAME env var")]
    pub repo_name: Option<String>,

    /// Commit message prefix
    #[arg(long = "message", short = 'm', value_name = "PREFIX", help = "Text placed before the timestamp in the commit message")]
    pub commit_prefix: Option<String>,

    /// Create the GitHub repository as private
    #[arg(long, help = "Create the GitHub repository as private instead of public")]
    pub private: bool,

    /// Explicit configuration file
    #[arg(long, value_name = "FILE", help = "Read settings from FILE instead of ./gh-publish.toml")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count, help = "Log more details to stderr (-v info, -vv debug)")]
    pub verbose: u8,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            repo_path: self.repo_path.clone(),
            repo_name: self.repo_name.clone(),
            commit_prefix: self.commit_prefix.clone(),
            private: self.private,
        }
    }
}
