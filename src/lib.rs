//! Memory Cache - An in-process key/value cache
//!
//! Provides time-based expiration, durability-driven eviction under an entry
//! limit, a background cleanup loop and optional whole-store snapshots.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod tasks;

pub use cache::{CacheEntry, CacheStats, CacheValue, Durability, EntryOptions, Expiration};
pub use config::CacheOptions;
pub use engine::MemoryCache;
pub use error::{CacheError, Result};
