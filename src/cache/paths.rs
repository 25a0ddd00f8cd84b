// Cache path utilities.
// Resolves the cache directory and the file behind each cache key.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// File name of the invocation log kept next to the cache entries.
pub const LOG_FILENAME: &str = "ghelper.log";

/// Platform cache directory (~/.cache/ghelper on Linux, ~/Library/Caches/ghelper on macOS).
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ghelper").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Pick the explicit directory (flag or Alfred's `alfred_workflow_cache`),
/// falling back to the platform cache directory.
pub fn resolve_cache_dir(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(default_cache_dir)
}

/// Path to the file holding a cache key.
pub fn entry_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.json", sanitize_name(key)))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
