//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store's expiration, capacity and eviction rules
//! against arbitrary operation sequences.

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::cache::{select_victim, CacheEntry, CacheStore, Durability, EntryOptions};

// == Test Configuration ==
const TEST_LIMIT_ENTRIES: usize = 100;

// == Strategies ==
/// Generates cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}".prop_map(|s| s)
}

/// Generates cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}".prop_map(|s| s)
}

fn durability_strategy() -> impl Strategy<Value = Durability> {
    prop_oneof![
        Just(Durability::Weak),
        Just(Durability::Normal),
        Just(Durability::Strong),
    ]
}

/// Offset in seconds from "now"; negative values are already expired.
fn offset_strategy() -> impl Strategy<Value = i64> {
    -600i64..3600
}

fn options_at(now: DateTime<Utc>, offset: i64, durability: Durability) -> EntryOptions {
    EntryOptions::expires_at(now + Duration::seconds(offset)).with_durability(durability)
}

fn live_options(now: DateTime<Utc>) -> EntryOptions {
    options_at(now, 300, Durability::Normal)
}

/// A sequence of cache operations
#[derive(Debug, Clone)]
enum CacheOp {
    Set {
        key: String,
        value: String,
        offset: i64,
        durability: Durability,
    },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (
            valid_key_strategy(),
            valid_value_strategy(),
            offset_strategy(),
            durability_strategy()
        )
            .prop_map(|(key, value, offset, durability)| CacheOp::Set {
                key,
                value,
                offset,
                durability
            }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a live entry and reading it back returns the stored value.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = CacheStore::new(TEST_LIMIT_ENTRIES);
        let now = Utc::now();

        store.set(key.clone(), value.clone(), live_options(now), now);

        prop_assert_eq!(store.get(&key, now), Some(&value));
    }

    // Lookups at or after the expiration never return the value, purged or not.
    #[test]
    fn prop_expired_entries_are_invisible(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        lifetime in 0i64..3600,
        extra in 0i64..3600,
    ) {
        let mut store = CacheStore::new(0);
        let now = Utc::now();
        let expires_at = now + Duration::seconds(lifetime);

        store.set(key.clone(), value, EntryOptions::expires_at(expires_at), now);

        let observed_at = expires_at + Duration::seconds(extra);
        prop_assert!(store.get(&key, observed_at).is_none());
        prop_assert_eq!(store.len(), 1, "Get must not purge");
    }

    // Deleting a key makes it unreadable.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = CacheStore::new(TEST_LIMIT_ENTRIES);
        let now = Utc::now();

        store.set(key.clone(), value, live_options(now), now);
        prop_assert!(store.delete(&key));
        prop_assert!(store.get(&key, now).is_none());
    }

    // Overwriting a key at capacity keeps every other entry.
    #[test]
    fn prop_overwrite_never_evicts(
        keys in prop::collection::hash_set(valid_key_strategy(), 1..20),
        value in valid_value_strategy(),
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut store = CacheStore::new(keys.len());
        let now = Utc::now();

        for key in &keys {
            store.set(key.clone(), format!("value_{}", key), live_options(now), now);
        }

        let evicted = store.set(keys[0].clone(), value.clone(), live_options(now), now);

        prop_assert_eq!(evicted, None);
        prop_assert_eq!(store.len(), keys.len());
        prop_assert_eq!(store.get(&keys[0], now), Some(&value));
    }

    // No sequence of operations pushes the store past its limit.
    #[test]
    fn prop_capacity_enforcement(ops in prop::collection::vec(cache_op_strategy(), 1..200)) {
        let limit = 10;
        let mut store = CacheStore::new(limit);
        let now = Utc::now();

        for op in ops {
            match op {
                CacheOp::Set { key, value, offset, durability } => {
                    store.set(key, value, options_at(now, offset, durability), now);
                }
                CacheOp::Get { key } => {
                    store.get(&key, now);
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
            }

            prop_assert!(
                store.len() <= limit,
                "Cache size {} exceeds limit {}",
                store.len(),
                limit
            );
        }
    }

    // The victim is expired if anything is, otherwise minimal by (durability, expiration).
    #[test]
    fn prop_victim_is_weakest(
        seeds in prop::collection::hash_map(
            valid_key_strategy(),
            (offset_strategy(), durability_strategy()),
            1..30,
        )
    ) {
        let now = Utc::now();
        let entries: HashMap<String, CacheEntry<u8>> = seeds
            .iter()
            .map(|(key, (offset, durability))| {
                (key.clone(), CacheEntry::new(0u8, options_at(now, *offset, *durability), now))
            })
            .collect();

        let victim = select_victim(&entries, now).expect("non-empty store has a victim");
        let chosen = &entries[&victim];

        if entries.values().any(|entry| entry.is_expired_at(now)) {
            prop_assert!(chosen.is_expired_at(now), "Expired entries must be evicted first");
        } else {
            for entry in entries.values() {
                prop_assert!(
                    (chosen.durability, chosen.expires_at) <= (entry.durability, entry.expires_at),
                    "Victim {:?} is not the weakest entry",
                    victim
                );
            }
        }
    }

    // Statistics agree with a straightforward model of the operations.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = CacheStore::new(TEST_LIMIT_ENTRIES);
        let now = Utc::now();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value, offset, durability } => {
                    store.set(key, value, options_at(now, offset, durability), now);
                }
                CacheOp::Get { key } => match store.get(&key, now) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }

    // A cleanup pass leaves exactly the live entries.
    #[test]
    fn prop_cleanup_keeps_only_live_entries(
        seeds in prop::collection::hash_map(valid_key_strategy(), offset_strategy(), 0..40)
    ) {
        let mut store = CacheStore::new(0);
        let now = Utc::now();

        for (key, offset) in &seeds {
            store.set(key.clone(), 0u8, options_at(now, *offset, Durability::Normal), now);
        }

        let live: HashSet<&String> = seeds
            .iter()
            .filter(|(_, offset)| **offset > 0)
            .map(|(key, _)| key)
            .collect();

        let removed = store.cleanup_expired(now);

        prop_assert_eq!(removed, seeds.len() - live.len());
        prop_assert_eq!(store.len(), live.len());
        for key in live {
            prop_assert!(store.get(key, now).is_some());
        }
    }
}
