// Cache store for reading and writing cached data.
// Handles JSON serialization, entry age, invalidation, and filesystem operations.

use std::fs;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned, de::IgnoredAny};

use crate::error::Result;

use super::paths::entry_path;

/// Max age meaning "never stale": only an explicit clear invalidates.
pub const NEVER_EXPIRE: Duration = Duration::ZERO;

/// Wrapper for cached data with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    /// Create a new cached data entry.
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    /// Time elapsed since the entry was written.
    pub fn age(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Check if this entry is older than `max_age`. A zero max age never expires.
    pub fn is_expired(&self, max_age: Duration) -> bool {
        !max_age.is_zero() && self.age() > max_age
    }
}

/// Keyed JSON file cache rooted at one directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    read_only: bool,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            read_only: false,
        }
    }

    /// Turn writes and clears into logged no-ops (dry run).
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        entry_path(&self.dir, key)
    }

    /// Read a key, returning None if absent, expired, or unreadable.
    pub fn read<T: DeserializeOwned>(&self, key: &str, max_age: Duration) -> Result<Option<T>> {
        match read_cached::<T>(&self.path_for(key)) {
            Ok(Some(cached)) if !cached.is_expired(max_age) => Ok(Some(cached.data)),
            Ok(_) => Ok(None),
            Err(err) => {
                tracing::warn!(key, error = %err, "discarding unreadable cache entry");
                Ok(None)
            }
        }
    }

    /// Write a fully built payload under `key`.
    pub fn write<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        if self.read_only {
            tracing::info!(key, "dry run, cache write skipped");
            return Ok(());
        }
        write_cached(&self.path_for(key), data)?;
        tracing::info!(key, "cache written");
        Ok(())
    }

    /// Age of a key; zero when the key is absent or unreadable.
    pub fn age(&self, key: &str) -> Duration {
        match read_cached::<IgnoredAny>(&self.path_for(key)) {
            Ok(Some(cached)) => cached.age(),
            _ => Duration::ZERO,
        }
    }

    /// Remove a key.
    pub fn clear(&self, key: &str) -> Result<()> {
        if self.read_only {
            tracing::info!(key, "dry run, cache clear skipped");
            return Ok(());
        }
        delete(&self.path_for(key))?;
        tracing::info!(key, "cache cleared");
        Ok(())
    }

    /// Return the cached payload for `key`, or await `fetch` and store its result.
    ///
    /// `fetch` is only polled on a miss. Nothing is written when it fails.
    pub async fn cached_or_fetch<T, F>(&self, key: &str, max_age: Duration, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T>>,
    {
        if let Some(data) = self.read(key, max_age)? {
            tracing::debug!(key, "cache hit");
            return Ok(data);
        }

        tracing::info!(key, "cache miss, fetching");
        let data = fetch.await?;
        self.write(key, &data)?;
        Ok(data)
    }
}

/// Read cached JSON data from a file.
pub fn read_cached<T: DeserializeOwned>(path: &Path) -> Result<Option<CachedData<T>>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let cached: CachedData<T> = serde_json::from_str(&contents)?;
    Ok(Some(cached))
}

/// Write data to cache as JSON.
pub fn write_cached<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let cached = CachedData::new(data);
    let json = serde_json::to_string(&cached)?;

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Delete a cached file.
pub fn delete(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
