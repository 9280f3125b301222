//! Cache Statistics Module
//!
//! Tracks cache activity: hits, misses, evictions and expired entries purged
//! by the cleanup loop.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of the cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of successful lookups
    pub hits: u64,
    /// Number of lookups that found nothing live
    pub misses: u64,
    /// Number of entries evicted to respect the entry limit
    pub evictions: u64,
    /// Number of expired entries removed by cleanup passes
    pub expired_purged: u64,
    /// Current number of entries, including expired ones not yet purged
    pub total_entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Counters ==
/// Live counters. Atomic so lookups can record under the shared lock.
#[derive(Debug, Default)]
pub struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expired_purged: AtomicU64,
}

impl StatsCounters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_purged(&self, count: usize) {
        self.expired_purged.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Copies the counters into a [`CacheStats`].
    pub fn snapshot(&self, total_entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expired_purged: self.expired_purged.load(Ordering::Relaxed),
            total_entries,
        }
    }
}
