// Per-invocation context.
// Carries the organization, API client, and cache store into every command.

use crate::cache::{CacheStore, resolve_cache_dir};
use crate::cli::Cli;
use crate::error::{GhelperError, Result};
use crate::github::GitHubClient;

/// Everything a command needs, built once from the command line.
pub struct Context {
    pub org: String,
    pub client: GitHubClient,
    pub cache: CacheStore,
    pub dry_run: bool,
}

impl Context {
    pub fn new(org: impl Into<String>, client: GitHubClient, cache: CacheStore, dry_run: bool) -> Self {
        Self {
            org: org.into(),
            client,
            cache: cache.read_only(dry_run),
            dry_run,
        }
    }

    /// Build the context from parsed arguments and their environment fallbacks.
    ///
    /// A missing token or org is not rejected here; GitHub answers 401 or 404.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cache_dir = resolve_cache_dir(cli.cache_dir.clone()).ok_or(GhelperError::NoCacheDir)?;
        let client = GitHubClient::with_base_url(&cli.token, &cli.api_url)?;

        if cli.token.is_empty() {
            tracing::warn!("no token configured, GitHub will reject the request");
        }
        tracing::debug!(org = %cli.org, cache_dir = %cache_dir.display(), "context ready");

        Ok(Self::new(&cli.org, client, CacheStore::new(cache_dir), cli.nothing))
    }
}
