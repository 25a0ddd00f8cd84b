// Command-line interface.
// Launcher invocation modes plus the environment-backed configuration Alfred passes in.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::github::GITHUB_API_BASE;

#[derive(Debug, Parser)]
#[command(
    name = "ghelper",
    version,
    about = "Search an organization's private repositories, members, and open pull requests from Alfred"
)]
pub struct Cli {
    /// Dry run. Don't actually change the cache.
    #[arg(short = 'n', long = "nothing", global = true)]
    pub nothing: bool,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// GitHub access token.
    #[arg(long, env = "token", hide_env_values = true, default_value = "", hide = true)]
    pub token: String,

    /// Organization slug.
    #[arg(long, env = "org", default_value = "", hide = true)]
    pub org: String,

    /// GitHub API root.
    #[arg(long, env = "GHELPER_API_URL", default_value = GITHUB_API_BASE, hide = true)]
    pub api_url: String,

    /// Cache directory (Alfred exports one per workflow).
    #[arg(long, env = "alfred_workflow_cache", hide = true)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show available workflow actions.
    List,
    /// Search the organization's private repositories.
    Repos {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Search the organization's members.
    Users {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// List open pull requests for a repository.
    Pulls {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Clear the cached repositories and members.
    Refreshcache,
}

/// Join query words the way the launcher typed them.
pub fn join_query(words: &[String]) -> String {
    words.join(" ")
}
