//! Cache Engine
//!
//! [`MemoryCache`] owns the store behind a single reader/writer lock, the
//! cleanup loop and the snapshot file.

use std::io::ErrorKind;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{
    load_snapshot, save_snapshot, CacheEntry, CacheStats, CacheStore, CacheValue, EntryOptions,
};
use crate::config::CacheOptions;
use crate::error::CacheError;
use crate::tasks::{spawn_cleanup_task, CleanupHandle};

/// The store as shared with the cleanup loop. `None` once the engine is closed.
pub type SharedStore<V> = Arc<RwLock<Option<CacheStore<V>>>>;

// No operation panics while holding the lock, so a poisoned map is still whole.
pub(crate) fn read_store<V>(
    store: &SharedStore<V>,
) -> RwLockReadGuard<'_, Option<CacheStore<V>>> {
    store.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_store<V>(
    store: &SharedStore<V>,
) -> RwLockWriteGuard<'_, Option<CacheStore<V>>> {
    store.write().unwrap_or_else(PoisonError::into_inner)
}

// == Memory Cache ==
/// Thread-safe key/value cache with expiration, durability-based eviction,
/// background cleanup and optional snapshot persistence.
///
/// All operations take `&self`; share an instance across threads with `Arc`.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use memory_cache::{CacheOptions, Durability, EntryOptions, MemoryCache};
///
/// let cache = MemoryCache::new(CacheOptions::default().with_limit_entries(100));
/// cache.set(
///     "user:1",
///     "Ada".to_string(),
///     EntryOptions::lifetime(Duration::from_secs(300)).with_durability(Durability::Strong),
/// );
/// assert_eq!(cache.get("user:1").as_deref(), Some("Ada"));
/// cache.close();
/// ```
#[derive(Debug)]
pub struct MemoryCache<V> {
    options: CacheOptions,
    store: SharedStore<V>,
    token: CancellationToken,
    cleanup: Option<CleanupHandle>,
}

impl<V: CacheValue> MemoryCache<V> {
    // == Constructor ==
    /// Creates the engine.
    ///
    /// Loads the snapshot file if one is configured (a missing or unreadable
    /// file leaves the cache empty) and starts the cleanup loop if the
    /// interval is non-zero.
    pub fn new(options: CacheOptions) -> Self {
        let store: SharedStore<V> =
            Arc::new(RwLock::new(Some(CacheStore::new(options.limit_entries))));
        let token = CancellationToken::new();

        let mut cache = Self {
            options,
            store,
            token,
            cleanup: None,
        };
        cache.load();

        cache.cleanup = if cache.options.cleanup_interval.is_zero() {
            None
        } else {
            match spawn_cleanup_task(
                cache.store.clone(),
                cache.options.cleanup_interval,
                cache.token.clone(),
            ) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    warn!(
                        "Cleanup task not started, expired entries will only be hidden: {}",
                        e
                    );
                    None
                }
            }
        };

        info!(
            "Memory cache initialized: limit_entries={}, cleanup_interval={}ms, store_file={:?}",
            cache.options.limit_entries,
            cache.options.cleanup_interval.as_millis(),
            cache.options.store_file
        );

        cache
    }

    // == Get ==
    /// Returns a clone of the value for `key` if it exists and has not expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let guard = read_store(&self.store);
        guard.as_ref()?.get(key, Utc::now()).cloned()
    }

    /// Returns a clone of the whole live entry, metadata included.
    pub fn get_entry(&self, key: &str) -> Option<CacheEntry<V>> {
        let guard = read_store(&self.store);
        guard.as_ref()?.entry(key, Utc::now()).cloned()
    }

    // == Set ==
    /// Inserts or overwrites `key`.
    ///
    /// With an entry limit configured, inserting a new key into a full cache
    /// evicts one entry first. A zero lifetime stores an already expired
    /// entry. No-op after [`close`](Self::close).
    pub fn set(&self, key: impl Into<String>, value: V, options: EntryOptions) {
        let mut guard = write_store(&self.store);
        if let Some(store) = guard.as_mut() {
            store.set(key.into(), value, options, Utc::now());
        }
    }

    // == Delete ==
    /// Removes `key` if present.
    pub fn delete(&self, key: &str) {
        let mut guard = write_store(&self.store);
        if let Some(store) = guard.as_mut() {
            store.delete(key);
        }
    }

    // == Count ==
    /// Number of entries, counting expired ones not yet purged.
    pub fn count(&self) -> usize {
        read_store(&self.store).as_ref().map_or(0, CacheStore::len)
    }

    // == Reset ==
    /// Removes every entry. The snapshot file is left alone.
    pub fn reset(&self) {
        let mut guard = write_store(&self.store);
        if let Some(store) = guard.as_mut() {
            store.reset();
        }
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        read_store(&self.store)
            .as_ref()
            .map(CacheStore::stats)
            .unwrap_or_default()
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    pub fn is_closed(&self) -> bool {
        read_store(&self.store).is_none()
    }

    /// Returns true once the cleanup loop has exited, or if it never ran.
    pub fn is_cleanup_stopped(&self) -> bool {
        self.cleanup.as_ref().map_or(true, CleanupHandle::is_finished)
    }

    // == Close ==
    /// Stops the cleanup loop, writes the snapshot if configured and releases
    /// the store. Later calls are no-ops.
    ///
    /// Does not wait for the loop to exit beyond acquiring the store lock.
    pub fn close(&self) {
        self.token.cancel();

        let mut guard = write_store(&self.store);
        let Some(store) = guard.take() else {
            return;
        };

        if let Some(path) = &self.options.store_file {
            match save_snapshot(path, store.entries()) {
                Ok(()) => debug!(
                    "Snapshot saved: {} entries to {}",
                    store.len(),
                    path.display()
                ),
                Err(e) => warn!("Failed to save snapshot to {}: {}", path.display(), e),
            }
        }

        info!("Memory cache closed");
    }

    /// Restores the snapshot, if any, under the exclusive lock.
    fn load(&self) {
        let Some(path) = &self.options.store_file else {
            return;
        };

        let mut guard = write_store(&self.store);
        let Some(store) = guard.as_mut() else {
            return;
        };

        match load_snapshot(path) {
            Ok(entries) => {
                store.replace_entries(entries);
                info!("Snapshot loaded: {} entries from {}", store.len(), path.display());
            }
            Err(CacheError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}, starting empty", path.display());
            }
            Err(e) => warn!(
                "Failed to load snapshot from {}, starting empty: {}",
                path.display(),
                e
            ),
        }
    }
}

impl<V> Drop for MemoryCache<V> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
