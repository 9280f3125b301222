//! Configuration Module
//!
//! Handles cache engine options, either built in code or loaded from
//! environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Cache engine options.
///
/// The default disables every optional behaviour: no cleanup loop, no entry
/// limit and no snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheOptions {
    /// Interval between cleanup passes, zero = no cleanup loop
    pub cleanup_interval: Duration,
    /// Maximum number of entries before eviction, zero = unbounded
    pub limit_entries: usize,
    /// Snapshot file loaded on construction and written on close
    pub store_file: Option<PathBuf>,
}

impl CacheOptions {
    /// Creates options loaded from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMORY_CACHE_CLEANUP_INTERVAL_MS` - Cleanup interval in milliseconds (default: 0)
    /// - `MEMORY_CACHE_LIMIT_ENTRIES` - Entry limit (default: 0)
    /// - `MEMORY_CACHE_STORE_FILE` - Snapshot path (default: unset)
    pub fn from_env() -> Self {
        Self {
            cleanup_interval: Duration::from_millis(
                env::var("MEMORY_CACHE_CLEANUP_INTERVAL_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0),
            ),
            limit_entries: env::var("MEMORY_CACHE_LIMIT_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            store_file: env::var("MEMORY_CACHE_STORE_FILE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    pub fn with_limit_entries(mut self, limit: usize) -> Self {
        self.limit_entries = limit;
        self
    }

    /// Sets the snapshot file. An empty path disables persistence.
    pub fn with_store_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.store_file = if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        };
        self
    }
}
