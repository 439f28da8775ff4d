//! Scripted command executor for tests.
//!
//! Responses are matched first by exact command line, then by the longest
//! registered prefix. Every invocation is recorded so tests can assert on
//! which commands ran and in what order.

use super::command::{CommandError, CommandExecutor, CommandOutput};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

type Response = Result<CommandOutput, CommandError>;

#[derive(Default)]
pub struct RecordingExecutor {
    exact: HashMap<String, Response>,
    prefixes: Vec<(String, Response)>,
    calls: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(stdout: &str) -> Response {
        Ok(CommandOutput {
            status_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    pub fn fail(status_code: i32, stderr: &str) -> Response {
        Ok(CommandOutput {
            status_code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }

    pub fn expect_command(mut self, program: &str, args: &[&str], response: Response) -> Self {
        self.exact.insert(Self::key(program, args), response);
        self
    }

    /// Match any invocation whose command line starts with `prefix`.
    /// Registering the same prefix again replaces the earlier response.
    pub fn expect_prefix(mut self, prefix: &str, response: Response) -> Self {
        self.prefixes.retain(|(existing, _)| existing != prefix);
        self.prefixes.push((prefix.to_string(), response));
        self.prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn key(program: &str, args: &[&str]) -> String {
        if args.is_empty() {
            program.to_string()
        } else {
            format!("{} {}", program, args.join(" "))
        }
    }
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn execute(
        &self,
        program: &str,
        args: &[&str],
        _cwd: &Path,
    ) -> Result<CommandOutput, CommandError> {
        let key = Self::key(program, args);
        self.calls.lock().unwrap().push(key.clone());

        if let Some(response) = self.exact.get(&key) {
            return response.clone();
        }
        self.prefixes
            .iter()
            .find(|(prefix, _)| key.starts_with(prefix.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or(Err(CommandError::CommandNotFound {
                command: program.to_string(),
            }))
    }
}
