//! Cache Module
//!
//! Provides a bounded compute-if-absent cache with TTL expiry, LRU eviction,
//! singleflight loads and live statistics.

mod bounded;
mod entry;
mod lru;
mod registry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use bounded::{BoundedCache, Lookup};
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use registry::{CacheRegistry, CacheSummary};
pub use stats::{format_percent, rate, CacheStats, StatsCounter};
pub use store::CacheStore;
