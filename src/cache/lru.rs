//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::BTreeMap;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Every tracked key owns a recency token drawn from a monotonically
/// increasing counter. Keys are indexed by token, so:
/// - Smallest token = Least recently used
/// - Largest token = Most recently used
///
/// The caller keeps the current token next to its entry and hands it back
/// on `touch` / `remove`.
#[derive(Debug)]
pub struct LruTracker<K> {
    /// Keys ordered by recency token
    order: BTreeMap<u64, K>,
    /// Next token to hand out
    next_token: u64,
}

impl<K> Default for LruTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
            next_token: 0,
        }
    }

    // == Insert ==
    /// Starts tracking `key` as the most recently used and returns its token.
    pub fn insert(&mut self, key: K) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        self.order.insert(token, key);
        token
    }

    // == Touch ==
    /// Marks the key holding `token` as most recently used.
    ///
    /// Returns the fresh token, or `None` if the token is not tracked.
    pub fn touch(&mut self, token: u64) -> Option<u64> {
        let key = self.order.remove(&token)?;
        Some(self.insert(key))
    }

    // == Remove ==
    /// Stops tracking the key holding `token`.
    pub fn remove(&mut self, token: u64) -> Option<K> {
        self.order.remove(&token)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        self.order.pop_first().map(|(_, key)| key)
    }

    // == Clear ==
    /// Forgets every tracked key. Tokens keep increasing afterwards.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
