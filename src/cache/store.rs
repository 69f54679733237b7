//! Cache Store Module
//!
//! Storage core combining HashMap storage with LRU tracking and write-based
//! expiry. Not synchronized; `BoundedCache` wraps it in a lock.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{CacheEntry, LruTracker, StatsCounter};
use crate::error::ConfigError;

// == Cache Store ==
/// Capacity- and TTL-bounded storage with LRU eviction.
///
/// The store counts the removals it decides on itself (capacity pressure
/// and expiry) and keeps the shared size gauge current. Hit and miss
/// accounting belongs to the caller.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Shared performance counters
    stats: Arc<StatsCounter>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Maximum entry age
    ttl: Duration,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and TTL.
    ///
    /// # Errors
    /// `ConfigError` if either bound is zero.
    pub fn new(
        capacity: usize,
        ttl: Duration,
        stats: Arc<StatsCounter>,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if ttl.is_zero() {
            return Err(ConfigError::ZeroTtl);
        }

        Ok(Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats,
            capacity,
            ttl,
        })
    }

    // == Get ==
    /// Returns a copy of the live value for `key` and marks it recently used.
    ///
    /// An expired entry is removed, counted as an eviction, and reported
    /// as absent.
    pub fn get(&mut self, key: &K, now: Instant) -> Option<V> {
        let entry = self.entries.get_mut(key)?;

        if entry.is_expired(self.ttl, now) {
            let recency = entry.recency;
            self.entries.remove(key);
            self.lru.remove(recency);
            self.stats.record_eviction();
            self.sync_size();
            debug!("Expired entry removed on access");
            return None;
        }

        if let Some(token) = self.lru.touch(entry.recency) {
            entry.recency = token;
        }
        Some(entry.value.clone())
    }

    // == Peek ==
    /// Returns the entry for `key` without touching recency or expiry.
    pub fn peek(&self, key: &K) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Insert ==
    /// Stores `value` under `key` with a fresh write timestamp.
    ///
    /// If the key already exists its value and timestamp are replaced.
    /// Otherwise, when the store is full, expired entries are dropped first
    /// and least recently used live entries only if that frees no room.
    pub fn insert(&mut self, key: K, value: V, now: Instant) {
        if let Some(old) = self.entries.remove(&key) {
            self.lru.remove(old.recency);
        } else if self.entries.len() >= self.capacity {
            self.purge_expired(now);

            while self.entries.len() >= self.capacity {
                let Some(victim) = self.lru.evict_oldest() else {
                    break;
                };
                if let Some(entry) = self.entries.remove(&victim) {
                    debug!(
                        capacity = self.capacity,
                        ttl_remaining_ms = entry.ttl_remaining(self.ttl, now).as_millis() as u64,
                        "Evicted least recently used entry"
                    );
                }
                self.stats.record_eviction();
            }
        }

        let recency = self.lru.insert(key.clone());
        self.entries.insert(key, CacheEntry::new(value, now, recency));
        self.sync_size();
    }

    // == Remove ==
    /// Removes an entry by key. Returns whether anything was removed.
    ///
    /// Explicit removal is not an eviction and leaves the counters alone.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.lru.remove(entry.recency);
                self.sync_size();
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Removes every entry. Counters are not reset.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.sync_size();
    }

    // == Purge Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed; each counts as an eviction.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let lru = &mut self.lru;
        let before = self.entries.len();

        self.entries.retain(|_, entry| {
            if entry.is_expired(ttl, now) {
                lru.remove(entry.recency);
                false
            } else {
                true
            }
        });

        let removed = before - self.entries.len();
        self.stats.record_evictions(removed as u64);
        self.sync_size();
        removed
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn sync_size(&self) {
        self.stats.set_size(self.entries.len());
    }
}
