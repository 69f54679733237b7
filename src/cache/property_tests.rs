//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the storage and accounting invariants against
//! arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::{BoundedCache, CacheStore, Lookup, StatsCounter};

// == Test Configuration ==
const TEST_CAPACITY: usize = 100;
const TEST_TTL: Duration = Duration::from_secs(600);

// == Strategies ==
/// Generates keys from a small space so sequences revisit them
fn key_strategy() -> impl Strategy<Value = u16> {
    0u16..64
}

/// A single cache operation
#[derive(Debug, Clone)]
enum CacheOp {
    Compute { key: u16, fail: bool },
    Evict { key: u16 },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        8 => (key_strategy(), prop::bool::weighted(0.1))
            .prop_map(|(key, fail)| CacheOp::Compute { key, fail }),
        2 => key_strategy().prop_map(|key| CacheOp::Evict { key }),
        1 => Just(CacheOp::Clear),
    ]
}

fn new_store(capacity: usize) -> CacheStore<u16, u32> {
    CacheStore::new(capacity, TEST_TTL, Arc::new(StatsCounter::new())).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hits, misses and load outcomes always add up to the calls made:
    // every call is a hit or a miss, and every miss ends in exactly one
    // load success or failure.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let cache: BoundedCache<u16, u32> = BoundedCache::new(16, TEST_TTL).unwrap();
        let mut hits = 0u64;
        let mut misses = 0u64;
        let mut failures = 0u64;

        for op in ops {
            match op {
                CacheOp::Compute { key, fail } => {
                    let result = tokio_test::block_on(cache.get_or_compute_traced(key, || async move {
                        if fail { Err("loader failed") } else { Ok(u32::from(key) * 3) }
                    }));
                    match result {
                        Ok((value, lookup)) => {
                            prop_assert_eq!(value, u32::from(key) * 3);
                            match lookup {
                                Lookup::Hit => hits += 1,
                                Lookup::Loaded => misses += 1,
                                Lookup::Joined => prop_assert!(false, "no concurrent callers"),
                            }
                        }
                        Err(_) => {
                            misses += 1;
                            failures += 1;
                        }
                    }
                }
                CacheOp::Evict { key } => {
                    cache.evict(&key);
                }
                CacheOp::Clear => cache.clear(),
            }
            prop_assert!(cache.len() <= 16);
        }

        let stats = cache.snapshot_stats();
        prop_assert_eq!(stats.hit_count, hits, "Hits mismatch");
        prop_assert_eq!(stats.miss_count, misses, "Misses mismatch");
        prop_assert_eq!(stats.load_failure_count, failures, "Failures mismatch");
        prop_assert_eq!(
            stats.load_success_count + stats.load_failure_count,
            stats.miss_count,
            "Every miss ends in exactly one load outcome"
        );
        prop_assert_eq!(stats.estimated_size, cache.len(), "Size mismatch");
    }

    // A stored value is returned unchanged until something removes it.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in any::<u32>()) {
        let mut store = new_store(TEST_CAPACITY);
        let now = Instant::now();

        store.insert(key, value, now);
        prop_assert_eq!(store.get(&key, now), Some(value));
    }

    // Removing a key makes it absent and is never counted as an eviction.
    #[test]
    fn prop_remove_clears_entry(key in key_strategy(), value in any::<u32>()) {
        let stats = Arc::new(StatsCounter::new());
        let mut store = CacheStore::new(TEST_CAPACITY, TEST_TTL, stats.clone()).unwrap();
        let now = Instant::now();

        store.insert(key, value, now);
        prop_assert!(store.remove(&key));
        prop_assert_eq!(store.get(&key, now), None);
        prop_assert_eq!(stats.snapshot().eviction_count, 0);
    }

    // The store never holds more than its capacity, and every overflow
    // insert evicts exactly one entry.
    #[test]
    fn prop_capacity_enforcement(keys in prop::collection::vec(key_strategy(), 1..200)) {
        let capacity = 10;
        let stats = Arc::new(StatsCounter::new());
        let mut store = CacheStore::new(capacity, TEST_TTL, stats.clone()).unwrap();
        let now = Instant::now();
        let mut distinct_inserts = 0u64;

        for key in keys {
            if store.peek(&key).is_none() {
                distinct_inserts += 1;
            }
            store.insert(key, 0, now);
            prop_assert!(
                store.len() <= capacity,
                "Store size {} exceeds capacity {}",
                store.len(),
                capacity
            );
        }

        let expected_evictions = distinct_inserts.saturating_sub(capacity as u64);
        prop_assert_eq!(stats.snapshot().eviction_count, expected_evictions);
    }

    // Entries are live up to and including the TTL and gone right after.
    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), age_secs in 0u64..1200) {
        let mut store = new_store(TEST_CAPACITY);
        let written = Instant::now();
        store.insert(key, 1, written);

        let found = store.get(&key, written + Duration::from_secs(age_secs));
        prop_assert_eq!(found.is_some(), age_secs <= TEST_TTL.as_secs());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Filling to capacity and inserting one more evicts the first key.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::hash_set(key_strategy(), 2..10),
        new_key in key_strategy(),
    ) {
        prop_assume!(!initial_keys.contains(&new_key));
        let keys: Vec<u16> = initial_keys.into_iter().collect();

        let capacity = keys.len();
        let mut store = new_store(capacity);
        let now = Instant::now();

        for key in &keys {
            store.insert(*key, 0, now);
        }
        prop_assert_eq!(store.len(), capacity, "Store should be at capacity");

        store.insert(new_key, 1, now);

        prop_assert_eq!(store.len(), capacity, "Store should remain at capacity");
        prop_assert!(store.peek(&keys[0]).is_none(), "Oldest key should be evicted");
        prop_assert!(store.peek(&new_key).is_some(), "New key should exist");
        for key in keys.iter().skip(1) {
            prop_assert!(store.peek(key).is_some(), "Key {} should still exist", key);
        }
    }

    // Reading a key protects it from being the next victim.
    #[test]
    fn prop_lru_access_tracking(
        initial_keys in prop::collection::hash_set(key_strategy(), 3..8),
        new_key in key_strategy(),
    ) {
        prop_assume!(!initial_keys.contains(&new_key));
        let keys: Vec<u16> = initial_keys.into_iter().collect();

        let capacity = keys.len();
        let mut store = new_store(capacity);
        let now = Instant::now();

        for key in &keys {
            store.insert(*key, 0, now);
        }

        prop_assert!(store.get(&keys[0], now).is_some());
        store.insert(new_key, 1, now);

        prop_assert!(store.peek(&keys[0]).is_some(), "Accessed key should survive");
        prop_assert!(store.peek(&keys[1]).is_none(), "Second key should be evicted");
        prop_assert!(store.peek(&new_key).is_some(), "New key should exist");
    }

    // Keys never interfere: each one maps to its own loader's value.
    #[test]
    fn prop_keys_are_independent(keys in prop::collection::vec(key_strategy(), 1..40)) {
        let cache: BoundedCache<u16, u32> = BoundedCache::new(TEST_CAPACITY, TEST_TTL).unwrap();
        let mut seen = HashSet::new();

        for key in keys {
            let (value, lookup) = tokio_test::block_on(cache.get_or_compute_traced(key, || async move {
                Ok::<_, Infallible>(u32::from(key) + 1000)
            }))
            .unwrap();

            prop_assert_eq!(value, u32::from(key) + 1000);
            prop_assert_eq!(lookup.is_hit(), !seen.insert(key));
        }
    }
}
