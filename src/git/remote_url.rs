const SSH_PREFIX: &str = "git@github.com:";
const HTTPS_PREFIX: &str = "https://github.com/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRepoInfo {
    pub owner: String,
    pub repo: String,
}

impl GitHubRepoInfo {
    pub fn web_url(&self) -> String {
        format!("{HTTPS_PREFIX}{}/{}", self.owner, self.repo)
    }
}

/// Parse a GitHub URL and extract owner/repo information
/// Handles both SSH (git@github.com:owner/repo.git) and HTTPS (https://github.com/owner/repo.git) formats
pub fn parse_github_url(url: &str) -> Option<GitHubRepoInfo> {
    let url = url.trim();

    // Handle SSH format: git@github.com:owner/repo.git
    if let Some(path) = url.strip_prefix(SSH_PREFIX) {
        let path = path.strip_suffix(".git").unwrap_or(path);

        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() == 2 && parts.iter().all(|p| !p.is_empty()) {
            return Some(GitHubRepoInfo {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            });
        }
    }

    // Handle HTTPS format: https://github.com/owner/repo.git
    if let Some(path) = url.strip_prefix(HTTPS_PREFIX) {
        let path = path.strip_suffix(".git").unwrap_or(path);

        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() >= 2 && !parts[0].is_empty() && !parts[1].is_empty() {
            return Some(GitHubRepoInfo {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            });
        }
    }

    // Not a recognized GitHub URL
    None
}

/// URL shown to the user after a push.
///
/// SSH-style GitHub remotes are rewritten to their browsable HTTPS form;
/// anything else is shown as configured. The remote itself is never touched.
pub fn display_url(remote_url: &str) -> String {
    let url = remote_url.trim();
    if url.starts_with(SSH_PREFIX) {
        if let Some(info) = parse_github_url(url) {
            return info.web_url();
        }
    }
    url.to_string()
}
