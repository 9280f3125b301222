//! Cache Store Module
//!
//! Unlocked key/value storage with expiration and durability-based eviction.
//! Locking is the caller's job; see [`MemoryCache`](crate::MemoryCache).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::eviction::select_victim;
use crate::cache::{CacheEntry, CacheStats, EntryOptions, StatsCounters};

// == Cache Store ==
/// Entry map plus the entry limit and activity counters.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Maximum number of entries, 0 = unbounded
    limit_entries: usize,
    /// Activity counters
    stats: StatsCounters,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store. `limit_entries == 0` means unbounded.
    pub fn new(limit_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            limit_entries,
            stats: StatsCounters::default(),
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired at `now`.
    ///
    /// Expired entries are left in place for the cleanup loop.
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<&V> {
        match self.entry(key, now) {
            Some(entry) => {
                self.stats.record_hit();
                Some(&entry.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Entry ==
    /// Returns the whole live entry for `key`, without touching the counters.
    pub fn entry(&self, key: &str, now: DateTime<Utc>) -> Option<&CacheEntry<V>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
    }

    // == Set ==
    /// Inserts or overwrites `key`.
    ///
    /// When an entry limit is set, the store holds at least that many entries
    /// and `key` is new, one victim is evicted first. Overwrites never evict.
    /// Returns the evicted key, if any.
    pub fn set(
        &mut self,
        key: String,
        value: V,
        options: EntryOptions,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let mut evicted = None;

        if self.limit_entries != 0
            && self.entries.len() >= self.limit_entries
            && !self.entries.contains_key(&key)
        {
            if let Some(victim) = select_victim(&self.entries, now) {
                self.entries.remove(&victim);
                self.stats.record_eviction();
                debug!(key = %victim, "Evicted entry to respect entry limit");
                evicted = Some(victim);
            }
        }

        self.entries.insert(key, CacheEntry::new(value, options, now));
        evicted
    }

    // == Delete ==
    /// Removes `key`. Returns whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Reset ==
    /// Drops every entry. Counters are kept.
    pub fn reset(&mut self) {
        self.entries = HashMap::new();
    }

    // == Cleanup Expired ==
    /// Removes all entries expired at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.entries.len();
        self.stats.record_purged(removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    // == Length ==
    /// Returns the number of entries, expired-but-unpurged ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrows the whole entry map, for snapshotting.
    pub(crate) fn entries(&self) -> &HashMap<String, CacheEntry<V>> {
        &self.entries
    }

    /// Replaces the whole entry map, for snapshot restore.
    pub(crate) fn replace_entries(&mut self, entries: HashMap<String, CacheEntry<V>>) {
        self.entries = entries;
    }
}
