use crate::error::PublishError;
use crate::external::Visibility;
use anyhow::Result;
use chrono::{DateTime, Local};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "gh-publish.toml";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Settings read from `gh-publish.toml` and `GH_PUBLISH_*` variables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Path to the local repository
    pub repo_path: Option<PathBuf>,
    /// Name of the GitHub repository
    pub repo_name: Option<String>,
    /// Text placed before the timestamp in commit messages
    pub commit_prefix: Option<String>,
    /// Create the GitHub repository as private
    pub private: bool,
}

impl FileConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Configuration file (`--config FILE` or ./gh-publish.toml)
    /// 2. Environment variables (prefixed with GH_PUBLISH_)
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        match config_file {
            Some(path) => {
                builder = builder.add_source(File::from(path));
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)));
            }
            None => {}
        }

        builder = builder.add_source(Environment::with_prefix("GH_PUBLISH").try_parsing(true));

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Values given on the command line (or through `REPO_PATH`/`REPO_NAME`).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub repo_path: Option<PathBuf>,
    pub repo_name: Option<String>,
    pub commit_prefix: Option<String>,
    pub private: bool,
}

/// Resolved configuration for one publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    pub repo_path: PathBuf,
    pub repo_name: String,
    pub commit_prefix: String,
    pub visibility: Visibility,
}

impl PublishConfig {
    pub fn new(repo_path: impl Into<PathBuf>, repo_name: impl Into<String>) -> Result<Self, PublishError> {
        Self::resolve(
            ConfigOverrides {
                repo_path: Some(repo_path.into()),
                repo_name: Some(repo_name.into()),
                ..Default::default()
            },
            FileConfig::default(),
        )
    }

    /// Merge overrides over file/env settings. Blank values count as unset.
    pub fn resolve(overrides: ConfigOverrides, file: FileConfig) -> Result<Self, PublishError> {
        let repo_path = overrides
            .repo_path
            .filter(|p| !p.as_os_str().is_empty())
            .or(file.repo_path.filter(|p| !p.as_os_str().is_empty()))
            .ok_or(PublishError::ConfigurationMissing { field: "repo_path" })?;

        let repo_name = non_blank(overrides.repo_name)
            .or(non_blank(file.repo_name))
            .ok_or(PublishError::ConfigurationMissing { field: "repo_name" })?;
        validate_repo_name(&repo_name)?;

        let commit_prefix = non_blank(overrides.commit_prefix)
            .or(non_blank(file.commit_prefix))
            .unwrap_or_else(|| format!("Update {repo_name}"));

        let visibility = if overrides.private || file.private {
            Visibility::Private
        } else {
            Visibility::Public
        };

        Ok(Self {
            repo_path,
            repo_name,
            commit_prefix,
            visibility,
        })
    }

    /// Location of the `.git` marker for the configured repository.
    pub fn marker_path(&self) -> PathBuf {
        self.repo_path.join(".git")
    }

    pub fn commit_message(&self, now: DateTime<Local>) -> String {
        format!("{} - {}", self.commit_prefix, now.format(TIMESTAMP_FORMAT))
    }
}

/// Accepts `NAME` or `OWNER/NAME`, each part made of ASCII letters, digits,
/// `.`, `_` and `-`, and never starting with `-`.
pub fn validate_repo_name(name: &str) -> Result<(), PublishError> {
    let invalid = |reason| PublishError::InvalidConfiguration {
        field: "repo_name",
        value: name.to_string(),
        reason,
    };

    let parts: Vec<&str> = name.split('/').collect();
    if parts.len() > 2 {
        return Err(invalid("expected NAME or OWNER/NAME"));
    }

    for part in parts {
        if part.is_empty() {
            return Err(invalid("owner and name must not be empty"));
        }
        if part.starts_with('-') {
            return Err(invalid("must not start with '-'"));
        }
        if part == "." || part == ".." {
            return Err(invalid("'.' and '..' are reserved"));
        }
        if !part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(invalid("only letters, digits, '.', '_' and '-' are allowed"));
        }
    }

    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
