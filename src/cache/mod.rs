// Cache module for local filesystem caching.
// Stores aggregated GitHub listings between launcher invocations.

pub mod paths;
pub mod store;

pub use paths::{LOG_FILENAME, default_cache_dir, resolve_cache_dir};
pub use store::{CacheStore, CachedData, NEVER_EXPIRE};
