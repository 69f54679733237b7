//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with write-based expiry.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Write timestamp, never changed after insertion
    pub written_at: Instant,
    /// Recency token, refreshed on every read and write
    pub recency: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry written at `now`.
    pub fn new(value: V, now: Instant, recency: u64) -> Self {
        Self {
            value,
            written_at: now,
            recency,
        }
    }

    // == Age ==
    /// Returns how long ago the entry was written.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.written_at)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl`.
    ///
    /// An entry whose age equals the TTL exactly is still live; it only
    /// expires once the age is strictly greater.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) > ttl
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, `Duration::ZERO` once expired.
    pub fn ttl_remaining(&self, ttl: Duration, now: Instant) -> Duration {
        ttl.saturating_sub(self.age(now))
    }
}
