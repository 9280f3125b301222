//! Cache Entry Module
//!
//! Defines individual cache entries, their durability tier and the options
//! a caller passes when storing a value.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest lifetime an entry can be given; longer lifetimes are clamped.
pub const MAX_LIFETIME: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Durability ==
/// Resistance of an entry to eviction when the entry limit is reached.
///
/// Ordered `Weak < Normal < Strong`; lower tiers are evicted first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(i8)]
pub enum Durability {
    /// Evicted first
    Weak = -1,
    /// Evicted once no `Weak` entries remain
    #[default]
    Normal = 0,
    /// Evicted once no `Normal` entries remain
    Strong = 1,
}

// == Expiration ==
/// When a stored entry stops being visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Absolute point in time
    At(DateTime<Utc>),
    /// Lifetime measured from the moment of the `set` call
    After(Duration),
}

impl Expiration {
    /// Resolves to an absolute timestamp relative to `now`.
    ///
    /// A zero lifetime resolves to `now`, i.e. an entry that is already
    /// expired. Lifetimes above [`MAX_LIFETIME`] are clamped.
    pub fn resolve(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match *self {
            Expiration::At(at) => at,
            Expiration::After(lifetime) => {
                let lifetime = lifetime.min(MAX_LIFETIME);
                // MAX_LIFETIME always fits in a chrono delta
                let delta =
                    chrono::Duration::from_std(lifetime).unwrap_or(chrono::Duration::zero());
                now.checked_add_signed(delta).unwrap_or(now)
            }
        }
    }
}

// == Entry Options ==
/// Per-call options for [`MemoryCache::set`](crate::MemoryCache::set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryOptions {
    /// When the entry expires
    pub expiration: Expiration,
    /// Eviction resistance, `Normal` unless overridden
    pub durability: Durability,
}

impl EntryOptions {
    /// Options for an entry expiring at an absolute time.
    pub fn expires_at(at: DateTime<Utc>) -> Self {
        Self {
            expiration: Expiration::At(at),
            durability: Durability::default(),
        }
    }

    /// Options for an entry living `lifetime` from now.
    pub fn lifetime(lifetime: Duration) -> Self {
        Self {
            expiration: Expiration::After(lifetime),
            durability: Durability::default(),
        }
    }

    /// Sets the durability tier.
    pub fn with_durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }
}

// == Cache Entry ==
/// A single cached value with its expiration and durability metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
    /// Absolute expiration time
    pub expires_at: DateTime<Utc>,
    /// Eviction resistance
    pub durability: Durability,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry written at `now`.
    pub fn new(value: V, options: EntryOptions, now: DateTime<Utc>) -> Self {
        Self {
            value,
            created_at: now,
            expires_at: options.expiration.resolve(now),
            durability: options.durability,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
