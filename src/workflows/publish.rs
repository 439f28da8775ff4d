//! Commit, ensure a GitHub remote, and push.
//!
//! Every step re-checks repository state before mutating anything, so a run
//! that was interrupted part way can simply be started again.

use crate::config::PublishConfig;
use crate::error::PublishError;
use crate::external::{
    CommandExecutor, GitClient, GitHubClient, GitHubOperations, GitRepository,
};
use crate::fs::FileSystemOperations;
use crate::git::display_url;
use crate::telemetry::{create_publish_span, generate_correlation_id};
use chrono::Local;
use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

pub const REMOTE: &str = "origin";
pub const BRANCH: &str = "main";

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// `origin` already existed and the branch was pushed to it.
    Pushed {
        url: Option<String>,
        committed: bool,
        renamed_branch: bool,
    },
    /// The GitHub repository was created and pushed by `gh`.
    Created { url: String, committed: bool },
}

impl PublishOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            PublishOutcome::Pushed { url, .. } => url.as_deref(),
            PublishOutcome::Created { url, .. } => Some(url.as_str()),
        }
    }
}

pub struct PublishWorkflow {
    config: PublishConfig,
    git: Arc<dyn GitRepository>,
    github: Arc<dyn GitHubOperations>,
    fs: Arc<dyn FileSystemOperations>,
}

impl PublishWorkflow {
    pub fn new(
        config: PublishConfig,
        executor: Arc<dyn CommandExecutor>,
        fs: Arc<dyn FileSystemOperations>,
    ) -> Self {
        let git = Arc::new(GitClient::new(executor.clone(), config.repo_path.clone()));
        let github = Arc::new(GitHubClient::new(executor, config.repo_path.clone()));
        Self::with_clients(config, git, github, fs)
    }

    pub fn with_clients(
        config: PublishConfig,
        git: Arc<dyn GitRepository>,
        github: Arc<dyn GitHubOperations>,
        fs: Arc<dyn FileSystemOperations>,
    ) -> Self {
        Self {
            config,
            git,
            github,
            fs,
        }
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    /// Run every step, writing progress to `out`.
    ///
    /// Stops at the first failure after printing guidance for it.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<PublishOutcome, PublishError> {
        let correlation_id = generate_correlation_id();
        let span = create_publish_span(&self.config.repo_name, &correlation_id);
        self.run_steps(out).instrument(span).await
    }

    async fn run_steps<W: Write>(&self, out: &mut W) -> Result<PublishOutcome, PublishError> {
        writeln!(out, "🚀 GitHub Publish: {}", self.config.repo_name)?;
        writeln!(out, "{}", "=".repeat(40))?;
        writeln!(out, "📁 Working in: {}", self.config.repo_path.display())?;

        self.verify_repository(out)?;

        let committed = self.commit_pending_changes(out).await?;

        if !self.has_origin(out).await? {
            let url = self.create_remote(out).await?;
            return Ok(PublishOutcome::Created { url, committed });
        }

        writeln!(out, "\n⬆️  Pushing to GitHub...")?;
        let renamed_branch = self.normalize_branch(out).await?;
        let url = self.push(out).await?;

        Ok(PublishOutcome::Pushed {
            url,
            committed,
            renamed_branch,
        })
    }

    fn verify_repository<W: Write>(&self, out: &mut W) -> Result<(), PublishError> {
        let marker = self.config.marker_path();
        if !self.fs.exists(&marker) {
            warn!(marker = %marker.display(), "repository marker missing");
            writeln!(out, "❌ Git repository not found. Please run 'git init' first.")?;
            return Err(PublishError::NotARepository {
                path: self.config.repo_path.clone(),
            });
        }

        writeln!(out, "✅ Git repository found")?;
        Ok(())
    }

    async fn commit_pending_changes<W: Write>(&self, out: &mut W) -> Result<bool, PublishError> {
        writeln!(out, "\n📊 Checking git status...")?;
        let pending = match self.git.has_pending_changes().await {
            Ok(pending) => pending,
            Err(e) => return Err(report(out, PublishError::Tool(e))),
        };

        if !pending {
            writeln!(out, "✅ No uncommitted changes")?;
            return Ok(false);
        }

        writeln!(out, "📝 Uncommitted changes found. Adding and committing...")?;
        if let Err(e) = self.git.stage_all().await {
            return Err(report(out, PublishError::Commit(e)));
        }

        let message = self.config.commit_message(Local::now());
        info!(%message, "committing pending changes");
        if let Err(e) = self.git.commit(&message).await {
            return Err(report(out, PublishError::Commit(e)));
        }

        writeln!(out, "✅ Changes committed")?;
        Ok(true)
    }

    async fn has_origin<W: Write>(&self, out: &mut W) -> Result<bool, PublishError> {
        writeln!(out, "\n🔗 Checking remote repository...")?;
        let remotes = match self.git.remotes().await {
            Ok(remotes) => remotes,
            Err(e) => return Err(report(out, PublishError::Tool(e))),
        };

        let found = remotes.iter().any(|r| r == REMOTE);
        if found {
            writeln!(out, "✅ Remote origin found")?;
        }
        Ok(found)
    }

    async fn create_remote<W: Write>(&self, out: &mut W) -> Result<String, PublishError> {
        let name = &self.config.repo_name;
        writeln!(out, "🆕 No remote origin found. Creating GitHub repository...")?;
        writeln!(out, "\n🔧 Attempting to create repository with GitHub CLI...")?;

        match self
            .github
            .create_repository(name, self.config.visibility, REMOTE)
            .await
        {
            Ok(printed) => {
                info!(repo = %name, output = %printed, "repository created with gh");
                writeln!(out, "🎉 Repository created and pushed successfully with GitHub CLI!")?;
                let url = self.created_repository_url(&printed).await;
                writeln!(out, "🌐 Repository URL: {url}")?;
                Ok(url)
            }
            Err(e) => {
                warn!(error = %e, "gh repo create failed");
                writeln!(out, "⚠️  GitHub CLI failed or not available.")?;
                writeln!(out, "   Reason: {}", e.detail())?;
                writeln!(out, "\n📋 Manual setup required:")?;
                writeln!(out, "1. Go to https://github.com/new")?;
                writeln!(out, "2. Create a repository named '{name}'")?;
                writeln!(out, "3. Don't initialize it with a README, license or .gitignore")?;
                writeln!(out, "4. Copy the repository URL")?;
                writeln!(out, "5. Run these commands:")?;
                writeln!(
                    out,
                    "   git remote add {REMOTE} https://github.com/YOUR_USERNAME/{name}.git"
                )?;
                writeln!(out, "   git branch -M {BRANCH}")?;
                writeln!(out, "   git push -u {REMOTE} {BRANCH}")?;
                Err(PublishError::RemoteSetup(e))
            }
        }
    }

    /// Login-based URL, else the origin URL, else what gh printed, else the bare name.
    async fn created_repository_url(&self, printed: &str) -> String {
        let name = &self.config.repo_name;
        match self.github.authenticated_login().await {
            Ok(login) => return format!("https://github.com/{login}/{name}"),
            Err(e) => warn!(error = %e, "could not resolve GitHub login"),
        }

        match self.git.remote_url(REMOTE).await {
            Ok(url) => return display_url(&url),
            Err(e) => warn!(error = %e, "could not read remote url"),
        }

        if printed.starts_with("https://") {
            printed.to_string()
        } else {
            name.clone()
        }
    }

    async fn normalize_branch<W: Write>(&self, out: &mut W) -> Result<bool, PublishError> {
        let current = match self.git.current_branch().await {
            Ok(branch) => branch,
            Err(e) => return Err(report(out, PublishError::Tool(e))),
        };

        if current == BRANCH {
            return Ok(false);
        }

        info!(from = %current, to = BRANCH, "renaming branch");
        writeln!(out, "🔄 Switching to {BRANCH} branch...")?;
        if let Err(e) = self.git.rename_current_branch(BRANCH).await {
            return Err(report(out, PublishError::Tool(e)));
        }
        Ok(true)
    }

    async fn push<W: Write>(&self, out: &mut W) -> Result<Option<String>, PublishError> {
        if let Err(e) = self.git.push_upstream(REMOTE, BRANCH).await {
            warn!(error = %e, "push failed");
            let err = report(out, PublishError::Push(e));
            writeln!(out, "❌ Failed to push to GitHub")?;
            writeln!(out, "\n🔧 Troubleshooting:")?;
            writeln!(out, "1. Check if the remote URL is correct: git remote -v")?;
            writeln!(out, "2. Verify GitHub authentication: gh auth status")?;
            writeln!(out, "3. Try manual push: git push -u {REMOTE} {BRANCH}")?;
            return Err(err);
        }

        writeln!(out, "🎉 Successfully pushed to GitHub!")?;

        match self.git.remote_url(REMOTE).await {
            Ok(remote_url) => {
                let url = display_url(&remote_url);
                writeln!(out, "🌐 Repository URL: {url}")?;
                Ok(Some(url))
            }
            Err(e) => {
                warn!(error = %e, "could not read remote url");
                Ok(None)
            }
        }
    }
}

/// Print a failure with the tool's own error text, then hand the error back.
fn report<W: Write>(out: &mut W, err: PublishError) -> PublishError {
    let written = match err.tool_failure() {
        Some(failure) => writeln!(out, "❌ Error running {}:", failure.command_line())
            .and_then(|_| writeln!(out, "{}", failure.stderr.trim_end())),
        None => writeln!(out, "❌ {err}"),
    };
    if let Err(io_err) = written {
        warn!(error = %io_err, "could not write failure report");
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::testing::RecordingExecutor;
    use crate::fs::MockFileSystemOperations;
    use chrono::NaiveDateTime;
    use std::path::Path;

    const CREATE: &str = "gh repo create --public --source=. --remote=origin --push -- widget";

    fn repo_fs(exists: bool) -> Arc<MockFileSystemOperations> {
        let mut mock_fs = MockFileSystemOperations::new();
        mock_fs
            .expect_exists()
            .withf(|path| path.ends_with(".git"))
            .return_const(exists);
        Arc::new(mock_fs)
    }

    /// Happy-path responses for every git call the workflow can make.
    fn scripted(status: &str, remotes: &str, branch: &str) -> RecordingExecutor {
        RecordingExecutor::new()
            .expect_command("git", &["status", "--porcelain"], RecordingExecutor::ok(status))
            .expect_command("git", &["add", "."], RecordingExecutor::ok(""))
            .expect_prefix("git commit -m ", RecordingExecutor::ok("[work abc123] update\n"))
            .expect_command("git", &["remote"], RecordingExecutor::ok(remotes))
            .expect_command("git", &["branch", "--show-current"], RecordingExecutor::ok(branch))
            .expect_command("git", &["branch", "-M", "main"], RecordingExecutor::ok(""))
            .expect_command("git", &["push", "-u", "origin", "main"], RecordingExecutor::ok(""))
            .expect_command(
                "git",
                &["remote", "get-url", "origin"],
                RecordingExecutor::ok("git@github.com:acme/widget.git\n"),
            )
    }

    async fn run(
        executor: Arc<RecordingExecutor>,
        fs: Arc<MockFileSystemOperations>,
    ) -> (Result<PublishOutcome, PublishError>, String) {
        let config = PublishConfig::new("/work/widget", "widget").unwrap();
        let workflow = PublishWorkflow::new(config, executor, fs);
        let mut out = Vec::new();
        let result = workflow.run(&mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    fn is_mutation(call: &str) -> bool {
        ["git add", "git commit", "git branch -M", "git push", "gh repo create"]
            .iter()
            .any(|prefix| call.starts_with(prefix))
    }

    #[tokio::test]
    async fn test_missing_marker_stops_before_any_command() {
        let executor = Arc::new(scripted(" M a.rs\n", "origin\n", "work\n"));

        let (result, output) = run(executor.clone(), repo_fs(false)).await;

        assert!(matches!(result, Err(PublishError::NotARepository { .. })));
        assert!(executor.calls().is_empty());
        assert!(output.contains("Git repository not found"));
    }

    #[tokio::test]
    async fn test_marker_check_receives_exact_repository_path() {
        let executor = Arc::new(scripted("", "origin\n", "main\n"));
        let mut mock_fs = MockFileSystemOperations::new();
        mock_fs
            .expect_exists()
            .withf(|path| path == Path::new("/work/widget/.git"))
            .times(1)
            .return_const(true);

        let (result, _) = run(executor, Arc::new(mock_fs)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_clean_tree_skips_staging_and_commit() {
        let executor = Arc::new(scripted("", "origin\n", "main\n"));

        let (result, output) = run(executor.clone(), repo_fs(true)).await;

        assert_eq!(
            result.unwrap(),
            PublishOutcome::Pushed {
                url: Some("https://github.com/acme/widget".to_string()),
                committed: false,
                renamed_branch: false,
            }
        );
        assert_eq!(executor.count_calls("git add"), 0);
        assert_eq!(executor.count_calls("git commit"), 0);
        assert_eq!(
            executor.calls()[..2],
            ["git status --porcelain".to_string(), "git remote".to_string()]
        );
        assert!(output.contains("No uncommitted changes"));
    }

    #[tokio::test]
    async fn test_dirty_tree_creates_exactly_one_timestamped_commit() {
        let executor = Arc::new(scripted("?? new.txt\n", "origin\n", "main\n"));

        let (result, _) = run(executor.clone(), repo_fs(true)).await;
        assert!(result.is_ok());

        let commits: Vec<String> = executor
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("git commit"))
            .collect();
        assert_eq!(commits.len(), 1);

        let message = commits[0].strip_prefix("git commit -m ").unwrap();
        let timestamp = message.strip_prefix("Update widget - ").unwrap();
        assert!(NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok());
        assert_eq!(timestamp.len(), 19);
    }

    #[tokio::test]
    async fn test_commit_failure_surfaces_tool_error_and_stops() {
        let executor = Arc::new(
            scripted(" M a.rs\n", "origin\n", "main\n").expect_prefix(
                "git commit -m ",
                RecordingExecutor::fail(128, "Author identity unknown\n"),
            ),
        );

        let (result, output) = run(executor.clone(), repo_fs(true)).await;

        assert!(matches!(result, Err(PublishError::Commit(_))));
        assert!(output.contains("Author identity unknown"));
        assert_eq!(executor.count_calls("git remote"), 0);
        assert_eq!(executor.count_calls("git push"), 0);
    }

    #[tokio::test]
    async fn test_staging_failure_skips_commit() {
        let executor = Arc::new(scripted(" M a.rs\n", "origin\n", "main\n").expect_command(
            "git",
            &["add", "."],
            RecordingExecutor::fail(128, "fatal: Unable to create '.git/index.lock': File exists.\n"),
        ));

        let (result, output) = run(executor.clone(), repo_fs(true)).await;

        assert!(matches!(result, Err(PublishError::Commit(_))));
        assert!(output.contains("index.lock"));
        assert_eq!(executor.count_calls("git commit"), 0);
    }

    #[tokio::test]
    async fn test_missing_origin_is_created_without_separate_push() {
        let executor = Arc::new(
            scripted("", "upstream\n", "work\n")
                .expect_prefix(CREATE, RecordingExecutor::ok("https://github.com/acme/widget\n"))
                .expect_command("gh", &["api", "user", "--jq", ".login"], RecordingExecutor::ok("acme\n")),
        );

        let (result, output) = run(executor.clone(), repo_fs(true)).await;

        assert_eq!(
            result.unwrap(),
            PublishOutcome::Created {
                url: "https://github.com/acme/widget".to_string(),
                committed: false,
            }
        );
        assert_eq!(executor.count_calls(CREATE), 1);
        assert_eq!(executor.count_calls("git push"), 0);
        assert_eq!(executor.count_calls("git branch"), 0);
        assert!(output.contains("🌐 Repository URL: https://github.com/acme/widget"));
    }

    #[tokio::test]
    async fn test_created_url_falls_back_to_remote_url() {
        let executor = Arc::new(
            scripted("", "", "main\n")
                .expect_prefix(CREATE, RecordingExecutor::ok(""))
                .expect_command("gh", &["api", "user", "--jq", ".login"], RecordingExecutor::fail(1, "HTTP 401\n")),
        );

        let (result, _) = run(executor, repo_fs(true)).await;

        assert_eq!(result.unwrap().url(), Some("https://github.com/acme/widget"));
    }

    #[tokio::test]
    async fn test_created_url_falls_back_to_gh_output() {
        let executor = Arc::new(
            scripted("", "", "main\n")
                .expect_prefix(CREATE, RecordingExecutor::ok("https://github.com/acme-org/widget\n"))
                .expect_command("gh", &["api", "user", "--jq", ".login"], RecordingExecutor::fail(1, "HTTP 401\n"))
                .expect_command("git", &["remote", "get-url", "origin"], RecordingExecutor::fail(2, "error: No such remote 'origin'\n")),
        );

        let (result, output) = run(executor, repo_fs(true)).await;

        assert_eq!(result.unwrap().url(), Some("https://github.com/acme-org/widget"));
        assert!(output.contains("🌐 Repository URL: https://github.com/acme-org/widget"));
    }

    #[tokio::test]
    async fn test_created_url_falls_back_to_bare_name() {
        let executor = Arc::new(
            scripted("", "", "main\n")
                .expect_prefix(CREATE, RecordingExecutor::ok(""))
                .expect_command("gh", &["api", "user", "--jq", ".login"], RecordingExecutor::fail(1, "HTTP 401\n"))
                .expect_command("git", &["remote", "get-url", "origin"], RecordingExecutor::fail(2, "error: No such remote 'origin'\n")),
        );

        let (result, output) = run(executor, repo_fs(true)).await;

        assert_eq!(
            result.unwrap(),
            PublishOutcome::Created {
                url: "widget".to_string(),
                committed: false,
            }
        );
        assert!(output.contains("🌐 Repository URL: widget"));
    }

    #[tokio::test]
    async fn test_failed_creation_prints_manual_steps_and_stops() {
        let executor = Arc::new(
            scripted(" M a.rs\n", "", "work\n")
                .expect_prefix(CREATE, RecordingExecutor::fail(4, "gh auth login required\n")),
        );

        let (result, output) = run(executor.clone(), repo_fs(true)).await;

        assert!(matches!(result, Err(PublishError::RemoteSetup(_))));
        assert!(output.contains("Manual setup required"));
        assert!(output.contains("Create a repository named 'widget'"));
        assert!(output.contains("git remote add origin https://github.com/YOUR_USERNAME/widget.git"));
        assert!(output.contains("git push -u origin main"));
        assert_eq!(executor.count_calls(CREATE), 1);
        assert_eq!(executor.calls().last().map(String::as_str), Some(CREATE));
    }

    #[tokio::test]
    async fn test_missing_gh_binary_is_not_fatal_to_reporting() {
        // No response registered for gh: the executor reports it as not found
        let executor = Arc::new(scripted("", "", "main\n"));

        let (result, output) = run(executor, repo_fs(true)).await;

        assert!(matches!(result, Err(PublishError::RemoteSetup(_))));
        assert!(output.contains("GitHub CLI failed or not available"));
        assert!(output.contains("Command not found: gh"));
    }

    #[tokio::test]
    async fn test_branch_is_renamed_before_push() {
        let executor = Arc::new(scripted("", "origin\n", "work\n"));

        let (result, output) = run(executor.clone(), repo_fs(true)).await;

        assert!(matches!(
            result.unwrap(),
            PublishOutcome::Pushed { renamed_branch: true, .. }
        ));
        let calls = executor.calls();
        let rename = calls.iter().position(|c| c == "git branch -M main").unwrap();
        let push = calls.iter().position(|c| c == "git push -u origin main").unwrap();
        assert!(rename < push);
        assert!(output.contains("Switching to main branch"));
    }

    #[tokio::test]
    async fn test_main_branch_is_not_renamed() {
        let executor = Arc::new(scripted("", "origin\n", "main\n"));

        run(executor.clone(), repo_fs(true)).await.0.unwrap();

        assert_eq!(executor.count_calls("git branch -M"), 0);
        assert_eq!(executor.count_calls("git push -u origin main"), 1);
    }

    #[tokio::test]
    async fn test_push_failure_prints_troubleshooting() {
        let executor = Arc::new(scripted("", "origin\n", "main\n").expect_command(
            "git",
            &["push", "-u", "origin", "main"],
            RecordingExecutor::fail(128, "fatal: Authentication failed\n"),
        ));

        let (result, output) = run(executor.clone(), repo_fs(true)).await;

        assert!(matches!(result, Err(PublishError::Push(_))));
        assert!(output.contains("Error running git push -u origin main"));
        assert!(output.contains("fatal: Authentication failed"));
        assert!(output.contains("Troubleshooting"));
        assert!(output.contains("gh auth status"));
        assert_eq!(executor.count_calls("git remote get-url"), 0);
    }

    #[tokio::test]
    async fn test_full_scenario_dirty_repo_on_work_branch() {
        let executor = Arc::new(scripted(" M src/lib.rs\n", "origin\n", "work\n"));

        let (result, output) = run(executor.clone(), repo_fs(true)).await;

        assert_eq!(
            result.unwrap(),
            PublishOutcome::Pushed {
                url: Some("https://github.com/acme/widget".to_string()),
                committed: true,
                renamed_branch: true,
            }
        );
        let mutations: Vec<String> = executor
            .calls()
            .into_iter()
            .filter(|c| is_mutation(c))
            .map(|c| c.split(" -m ").next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(
            mutations,
            vec![
                "git add .".to_string(),
                "git commit".to_string(),
                "git branch -M main".to_string(),
                "git push -u origin main".to_string(),
            ]
        );
        assert!(output.contains("Changes committed"));
        assert!(output.contains("🌐 Repository URL: https://github.com/acme/widget"));
    }

    #[tokio::test]
    async fn test_status_failure_is_a_tool_error() {
        let executor = Arc::new(scripted("", "origin\n", "main\n").expect_command(
            "git",
            &["status", "--porcelain"],
            RecordingExecutor::fail(128, "fatal: not a git repository\n"),
        ));

        let (result, output) = run(executor.clone(), repo_fs(true)).await;

        assert!(matches!(result, Err(PublishError::Tool(_))));
        assert!(output.contains("fatal: not a git repository"));
        assert!(executor.calls().iter().all(|c| !is_mutation(c)));
    }
}
