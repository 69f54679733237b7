//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, loads and
//! evictions. Counters are atomics so a snapshot never waits on the
//! storage lock.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::Serialize;

// == Stats Counter ==
/// Live, shared counters for one cache instance.
///
/// Counters only ever go up. `size` mirrors the entry count and is written
/// by the store after each mutation.
#[derive(Debug, Default)]
pub struct StatsCounter {
    hits: AtomicU64,
    misses: AtomicU64,
    load_successes: AtomicU64,
    load_failures: AtomicU64,
    evictions: AtomicU64,
    size: AtomicUsize,
}

impl StatsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_success(&self) {
        self.load_successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    /// Updates the estimated size.
    pub fn set_size(&self, size: usize) {
        self.size.store(size, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Returns a point-in-time copy of every counter.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hits.load(Ordering::Relaxed),
            miss_count: self.misses.load(Ordering::Relaxed),
            load_success_count: self.load_successes.load(Ordering::Relaxed),
            load_failure_count: self.load_failures.load(Ordering::Relaxed),
            eviction_count: self.evictions.load(Ordering::Relaxed),
            estimated_size: self.size.load(Ordering::Relaxed),
        }
    }
}

// == Cache Stats ==
/// Immutable snapshot of a cache's performance metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a live entry
    pub hit_count: u64,
    /// Lookups that started a load
    pub miss_count: u64,
    /// Loads that produced a value
    pub load_success_count: u64,
    /// Loads whose loader failed
    pub load_failure_count: u64,
    /// Entries removed by capacity pressure or expiry
    pub eviction_count: u64,
    /// Number of entries at snapshot time
    pub estimated_size: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of lookups counted as either hit or miss.
    pub fn request_count(&self) -> u64 {
        self.hit_count + self.miss_count
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        rate(self.hit_count, self.request_count())
    }

    // == Miss Rate ==
    /// Returns misses / (hits + misses), or 0.0 if no requests have been made.
    pub fn miss_rate(&self) -> f64 {
        rate(self.miss_count, self.request_count())
    }

    /// Hit rate as a percentage string, e.g. `"94.00%"`.
    pub fn hit_rate_percent(&self) -> String {
        format_percent(self.hit_rate())
    }

    /// Miss rate as a percentage string, e.g. `"6.00%"`.
    pub fn miss_rate_percent(&self) -> String {
        format_percent(self.miss_rate())
    }
}

/// Returns `part / total`, 0.0 when `total` is zero.
pub fn rate(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Formats a ratio in `[0, 1]` as a percentage with two decimals.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_count, 0);
        assert_eq!(stats.miss_count, 0);
        assert_eq!(stats.eviction_count, 0);
        assert_eq!(stats.estimated_size, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.miss_rate(), 0.0);
        assert_eq!(stats.hit_rate_percent(), "0.00%");
        assert_eq!(stats.miss_rate_percent(), "0.00%");
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let counter = StatsCounter::new();
        counter.record_hit();
        counter.record_hit();
        counter.record_hit();
        let stats = counter.snapshot();
        assert_eq!(stats.hit_rate(), 1.0);
        assert_eq!(stats.hit_rate_percent(), "100.00%");
    }

    #[test]
    fn test_hit_rate_all_misses() {
        let counter = StatsCounter::new();
        counter.record_miss();
        counter.record_miss();
        let stats = counter.snapshot();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.miss_rate(), 1.0);
    }

    #[test]
    fn test_rate_percent_formatting() {
        let stats = CacheStats {
            hit_count: 47,
            miss_count: 3,
            ..CacheStats::default()
        };
        assert_eq!(stats.hit_rate_percent(), "94.00%");
        assert_eq!(stats.miss_rate_percent(), "6.00%");
    }

    #[test]
    fn test_load_counters() {
        let counter = StatsCounter::new();
        counter.record_load_success();
        counter.record_load_success();
        counter.record_load_failure();
        let stats = counter.snapshot();
        assert_eq!(stats.load_success_count, 2);
        assert_eq!(stats.load_failure_count, 1);
    }

    #[test]
    fn test_record_eviction() {
        let counter = StatsCounter::new();
        counter.record_eviction();
        counter.record_evictions(3);
        assert_eq!(counter.snapshot().eviction_count, 4);
    }

    #[test]
    fn test_set_size() {
        let counter = StatsCounter::new();
        counter.set_size(42);
        assert_eq!(counter.snapshot().estimated_size, 42);
    }
}
