//! Cache Module
//!
//! Provides in-memory storage with expiration, durability-based eviction and
//! whole-store snapshots.

mod entry;
mod eviction;
mod snapshot;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use serde::de::DeserializeOwned;
use serde::Serialize;

// Re-export public types
pub use entry::{CacheEntry, Durability, EntryOptions, Expiration, MAX_LIFETIME};
pub use eviction::select_victim;
pub use snapshot::{load_snapshot, save_snapshot, SNAPSHOT_VERSION};
pub use stats::{CacheStats, StatsCounters};
pub use store::CacheStore;

// == Cache Value ==
/// Bounds every cached value type must meet.
///
/// Blanket-implemented. Use `serde_json::Value` to hold mixed value types
/// in a single cache.
pub trait CacheValue: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {}

impl<T> CacheValue for T where T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {}
