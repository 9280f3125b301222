//! Eviction Selector Module
//!
//! Chooses which entry to drop when a new key would push the store past its
//! entry limit. Expired entries go first, then the lowest durability tier,
//! then whichever of those expires soonest.
//!
//! The scan is O(n) per eviction; no secondary priority queue is kept.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::cache::{CacheEntry, Durability};

// == Select Victim ==
/// Picks the key to evict, or `None` if the store is empty.
///
/// Scans the entries once. The first expired entry met is returned
/// immediately; otherwise the live entry with the smallest
/// `(durability, expires_at)` pair wins.
pub fn select_victim<V>(
    entries: &HashMap<String, CacheEntry<V>>,
    now: DateTime<Utc>,
) -> Option<String> {
    let mut victim: Option<(&String, Durability, DateTime<Utc>)> = None;

    for (key, entry) in entries {
        if entry.is_expired_at(now) {
            return Some(key.clone());
        }

        let weaker = match victim {
            None => true,
            Some((_, durability, expires_at)) => {
                (entry.durability, entry.expires_at) < (durability, expires_at)
            }
        };

        if weaker {
            victim = Some((key, entry.durability, entry.expires_at));
        }
    }

    victim.map(|(key, _, _)| key.clone())
}
