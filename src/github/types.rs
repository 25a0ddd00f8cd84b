// GitHub API response types.
// Wire structs for the REST payloads and the typed records built from them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Owner type discriminator (user or organization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OwnerType {
    #[default]
    User,
    Organization,
    Bot,
    #[serde(other)]
    Unknown,
}

/// GitHub user or organization, as embedded in member lists and pull requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: u64,
    pub login: String,
    #[serde(rename = "type", default)]
    pub owner_type: OwnerType,
    pub html_url: String,
}

/// Repository element of `/orgs/{org}/repos`.
///
/// Only the fields ghelper keeps are deserialized. The API also sends a `url`
/// field (the API address), which is why the record type does not read this
/// payload directly.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryPayload {
    pub id: u64,
    pub name: String,
    pub html_url: String,
}

/// Cached repository record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    /// Canonical web URL.
    pub url: String,
}

impl From<RepositoryPayload> for Repository {
    fn from(payload: RepositoryPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name,
            url: payload.html_url,
        }
    }
}

/// Cached organization member record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: u64,
    pub login: String,
    pub url: String,
}

impl From<Owner> for Member {
    fn from(owner: Owner) -> Self {
        Self {
            id: owner.id,
            login: owner.login,
            url: owner.html_url,
        }
    }
}

/// Open pull request. Never cached.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub user: Owner,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}

impl PullRequest {
    /// Launcher title, e.g. `Fix login (PR-42)`.
    pub fn display_title(&self) -> String {
        format!("{} (PR-{})", self.title, self.number)
    }

    /// Launcher subtitle naming the author and the creation timestamp as
    /// GitHub reports it.
    pub fn display_subtitle(&self) -> String {
        format!(
            "Opened by: {}, on: {}",
            self.user.login,
            self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

impl RateLimit {
    /// Whether the last response reported an exhausted quota.
    pub fn is_exhausted(&self) -> bool {
        self.limit > 0 && self.remaining == 0
    }
}
