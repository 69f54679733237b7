//! Bounded Cache Module
//!
//! Thread-safe compute-if-absent cache. Wraps a `CacheStore` in a mutex and
//! coordinates concurrent misses so each key has at most one loader running.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cache::{CacheStats, CacheStore, StatsCounter};
use crate::error::{ConfigError, LoadError};

/// Result slot of an in-flight load. `None` until the owner resolves it.
type Outcome<V> = Option<Result<V, LoadError>>;

// == Lookup ==
/// How a `get_or_compute` call obtained its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Served from a live entry
    Hit,
    /// This call ran the loader
    Loaded,
    /// Another call was already loading the key; this one waited for it
    Joined,
}

impl Lookup {
    /// True when the value came straight from storage.
    pub fn is_hit(self) -> bool {
        matches!(self, Lookup::Hit)
    }
}

struct InFlight<V> {
    id: u64,
    outcome: watch::Receiver<Outcome<V>>,
}

struct Inner<K, V> {
    store: CacheStore<K, V>,
    in_flight: HashMap<K, InFlight<V>>,
    next_load_id: u64,
}

enum Slot<V> {
    Hit(V),
    Wait(watch::Receiver<Outcome<V>>),
    Own {
        id: u64,
        publish: watch::Sender<Outcome<V>>,
    },
}

// == Bounded Cache ==
/// A capacity- and time-bounded cache with a computed-value-on-miss contract.
///
/// Storage and the in-flight table share one mutex, so "is there an entry"
/// and "is someone loading it" are always answered together. The lock is
/// never held while a loader runs. Statistics are atomics and can be read
/// without touching the lock.
pub struct BoundedCache<K, V> {
    inner: Mutex<Inner<K, V>>,
    stats: Arc<StatsCounter>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries for at most `ttl`.
    ///
    /// # Errors
    /// `ConfigError` if either bound is zero.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self, ConfigError> {
        let stats = Arc::new(StatsCounter::new());
        let store = CacheStore::new(capacity, ttl, stats.clone())?;

        Ok(Self {
            inner: Mutex::new(Inner {
                store,
                in_flight: HashMap::new(),
                next_load_id: 0,
            }),
            stats,
        })
    }

    // == Get Or Compute ==
    /// Returns the cached value for `key`, running `loader` on a miss.
    ///
    /// Concurrent misses on the same key share a single loader run: the
    /// first caller executes it, the others wait and receive the same value
    /// or the same error. Failures are never stored, so the next call after
    /// a failed load runs the loader again.
    pub async fn get_or_compute<F, Fut, E>(&self, key: K, loader: F) -> Result<V, LoadError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        self.get_or_compute_traced(key, loader)
            .await
            .map(|(value, _)| value)
    }

    /// Same as [`get_or_compute`](Self::get_or_compute), also reporting
    /// whether the value was a hit, a fresh load, or a joined load.
    pub async fn get_or_compute_traced<F, Fut, E>(
        &self,
        key: K,
        loader: F,
    ) -> Result<(V, Lookup), LoadError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        match self.acquire(&key) {
            Slot::Hit(value) => Ok((value, Lookup::Hit)),
            Slot::Wait(outcome) => {
                debug!("Joining in-flight load");
                let value = join(outcome).await?;
                Ok((value, Lookup::Joined))
            }
            Slot::Own { id, publish } => {
                let mut guard = LoadGuard {
                    cache: self,
                    key,
                    id,
                    publish,
                    finished: false,
                };
                let result = loader().await.map_err(LoadError::failed);
                let value = guard.finish(result)?;
                Ok((value, Lookup::Loaded))
            }
        }
    }

    /// Decides, under the lock, whether this call hits, waits, or loads.
    fn acquire(&self, key: &K) -> Slot<V> {
        let mut inner = self.lock();

        if let Some(value) = inner.store.get(key, now()) {
            self.stats.record_hit();
            return Slot::Hit(value);
        }

        if let Some(flight) = inner.in_flight.get(key) {
            return Slot::Wait(flight.outcome.clone());
        }

        self.stats.record_miss();
        let id = inner.next_load_id;
        inner.next_load_id += 1;
        let (publish, outcome) = watch::channel(None);
        inner
            .in_flight
            .insert(key.clone(), InFlight { id, outcome });
        debug!(load_id = id, "Cache miss, starting load");
        Slot::Own { id, publish }
    }

    // == Evict ==
    /// Removes the entry for `key`. Absent keys are a no-op.
    ///
    /// Returns whether an entry was removed. Does not count as an eviction
    /// and does not cancel an in-flight load for the key.
    pub fn evict(&self, key: &K) -> bool {
        let removed = self.lock().store.remove(key);
        if removed {
            debug!("Entry evicted on request");
        }
        removed
    }

    // == Clear ==
    /// Removes every entry. Statistics and in-flight loads are untouched;
    /// loads still running store their result once they finish.
    pub fn clear(&self) {
        self.lock().store.clear();
        debug!("Cache cleared");
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        self.lock().store.purge_expired(now())
    }

    // == Stats ==
    /// Returns a snapshot of the counters. Never takes the storage lock.
    pub fn snapshot_stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    /// Returns the number of stored entries, including expired ones not yet
    /// removed.
    pub fn len(&self) -> usize {
        self.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().store.capacity()
    }

    pub fn ttl(&self) -> Duration {
        self.lock().store.ttl()
    }

    /// Write timestamp of the stored entry for `key`, if any.
    pub fn written_at(&self, key: &K) -> Option<Instant> {
        self.lock().store.peek(key).map(|entry| entry.written_at)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        // Critical sections never leave the state half-updated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> std::fmt::Debug for BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedCache")
            .field("capacity", &self.capacity())
            .field("ttl", &self.ttl())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

/// Current time on the tokio clock, so paused-time tests drive expiry.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Waits for the owner of an in-flight load to publish its outcome.
async fn join<V: Clone>(mut outcome: watch::Receiver<Outcome<V>>) -> Result<V, LoadError> {
    let published = match outcome.wait_for(Option::is_some).await {
        Ok(slot) => (*slot).clone(),
        Err(_) => None,
    };
    published.unwrap_or(Err(LoadError::Abandoned))
}

// == Load Guard ==
/// Ownership of one key's in-flight slot.
///
/// `finish` stores the outcome and wakes waiters. If the owning future is
/// dropped first, `Drop` releases the slot and the waiters see
/// `LoadError::Abandoned`.
struct LoadGuard<'a, K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    cache: &'a BoundedCache<K, V>,
    key: K,
    id: u64,
    publish: watch::Sender<Outcome<V>>,
    finished: bool,
}

impl<K, V> LoadGuard<'_, K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn finish(&mut self, result: Result<V, LoadError>) -> Result<V, LoadError> {
        {
            let mut inner = self.cache.lock();
            match &result {
                Ok(value) => {
                    inner.store.insert(self.key.clone(), value.clone(), now());
                    self.cache.stats.record_load_success();
                }
                Err(err) => {
                    self.cache.stats.record_load_failure();
                    warn!(load_id = self.id, error = %err, "Load failed");
                }
            }
            self.release(&mut inner);
        }

        self.finished = true;
        self.publish.send_replace(Some(result.clone()));
        result
    }

    /// Drops the in-flight record if it still belongs to this load.
    fn release(&self, inner: &mut Inner<K, V>) {
        if inner
            .in_flight
            .get(&self.key)
            .is_some_and(|flight| flight.id == self.id)
        {
            inner.in_flight.remove(&self.key);
        }
    }
}

impl<K, V> Drop for LoadGuard<'_, K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut inner = self.cache.lock();
        self.cache.stats.record_load_failure();
        self.release(&mut inner);
        warn!(load_id = self.id, "Load abandoned before completion");
    }
}
