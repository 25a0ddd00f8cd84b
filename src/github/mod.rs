// GitHub API module.
// Provides the client, pager, and types for the GitHub REST API.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{GITHUB_API_BASE, GitHubClient};
pub use endpoints::{MEMBER_PAGES, PER_PAGE, REPO_PAGES, Resource};
pub use types::*;
