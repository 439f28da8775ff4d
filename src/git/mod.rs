// Git remote helpers shared by the publish workflow

pub mod remote_url;

pub use remote_url::{display_url, parse_github_url, GitHubRepoInfo};
