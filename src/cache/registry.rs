//! Cache Registry Module
//!
//! Named table of cache instances, built once at startup.

use std::collections::BTreeMap;
use std::hash::Hash;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::cache::stats::{format_percent, rate};
use crate::cache::{BoundedCache, CacheStats};

// == Cache Summary ==
/// Totals across every registered cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheSummary {
    pub cache_count: usize,
    pub total_hits: u64,
    pub total_misses: u64,
    pub total_load_successes: u64,
    pub total_load_failures: u64,
    pub total_evictions: u64,
    pub total_size: usize,
    /// Overall hit rate, formatted as a percentage
    pub overall_hit_rate: String,
}

// == Cache Registry ==
/// Maps cache names to shared cache instances.
///
/// Names iterate in sorted order, so listings and summaries are stable.
pub struct CacheRegistry<K, V> {
    caches: BTreeMap<String, Arc<BoundedCache<K, V>>>,
}

impl<K, V> Default for CacheRegistry<K, V> {
    fn default() -> Self {
        Self {
            caches: BTreeMap::new(),
        }
    }
}

impl<K, V> CacheRegistry<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Adds `cache` under `name`, returning the instance it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        cache: Arc<BoundedCache<K, V>>,
    ) -> Option<Arc<BoundedCache<K, V>>> {
        let name = name.into();
        info!(
            cache = %name,
            capacity = cache.capacity(),
            ttl_secs = cache.ttl().as_secs(),
            "Cache registered"
        );
        self.caches.insert(name, cache)
    }

    pub fn get(&self, name: &str) -> Option<Arc<BoundedCache<K, V>>> {
        self.caches.get(name).cloned()
    }

    /// Registered cache names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    // == Clear ==
    /// Clears the named cache. Returns false if no cache has that name.
    pub fn clear(&self, name: &str) -> bool {
        match self.caches.get(name) {
            Some(cache) => {
                cache.clear();
                true
            }
            None => false,
        }
    }

    // == Stats ==
    /// Snapshot of every cache's counters, keyed by name.
    pub fn stats(&self) -> BTreeMap<String, CacheStats> {
        self.caches
            .iter()
            .map(|(name, cache)| (name.clone(), cache.snapshot_stats()))
            .collect()
    }

    // == Summary ==
    /// Sums the counters of all caches into one report.
    pub fn summary(&self) -> CacheSummary {
        let mut summary = self
            .caches
            .values()
            .map(|cache| cache.snapshot_stats())
            .fold(CacheSummary::default(), |mut acc, stats| {
                acc.cache_count += 1;
                acc.total_hits += stats.hit_count;
                acc.total_misses += stats.miss_count;
                acc.total_load_successes += stats.load_success_count;
                acc.total_load_failures += stats.load_failure_count;
                acc.total_evictions += stats.eviction_count;
                acc.total_size += stats.estimated_size;
                acc
            });

        summary.overall_hit_rate = format_percent(rate(
            summary.total_hits,
            summary.total_hits + summary.total_misses,
        ));
        summary
    }
}
