// Consistent exit codes for gh-publish.
//
//   0 = success
//   1 = general error (status/remote queries, output failures)
//   2 = configuration missing or invalid
//   3 = not a git repository
//   4 = staging or commit failed
//   5 = GitHub repository could not be created, manual setup required
//   6 = push failed

use crate::error::PublishError;
use std::process;

/// Named exit codes for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    Config = 2,
    NotARepository = 3,
    CommitFailed = 4,
    RemoteSetupRequired = 5,
    PushFailed = 6,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_error(err: &PublishError) -> Self {
        match err {
            PublishError::ConfigurationMissing { .. }
            | PublishError::InvalidConfiguration { .. } => Self::Config,
            PublishError::NotARepository { .. } => Self::NotARepository,
            PublishError::Commit(_) => Self::CommitFailed,
            PublishError::RemoteSetup(_) => Self::RemoteSetupRequired,
            PublishError::Push(_) => Self::PushFailed,
            PublishError::Tool(_) | PublishError::Output(_) => Self::Error,
        }
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code.code() as u8)
    }
}
