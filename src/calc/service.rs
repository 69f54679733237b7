//! Calculator Service
//!
//! Arithmetic operations cached in the "calculations" cache. Every load
//! sleeps for a configured latency to stand in for expensive work.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{BoundedCache, Lookup};
use crate::calc::{CalcError, CalcKey, Operation};
use crate::error::LoadError;

/// Name of the cache the calculator registers.
pub const CALCULATIONS_CACHE: &str = "calculations";

pub type CalcCache = BoundedCache<CalcKey, f64>;

// == Calculation ==
/// Result of one calculator request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculation {
    pub result: f64,
    pub lookup: Lookup,
}

// == Calculator Service ==
/// Runs calculations through a shared cache.
#[derive(Clone)]
pub struct CalculatorService {
    cache: Arc<CalcCache>,
    latency: Duration,
}

impl CalculatorService {
    pub fn new(cache: Arc<CalcCache>, latency: Duration) -> Self {
        Self { cache, latency }
    }

    pub fn cache(&self) -> &Arc<CalcCache> {
        &self.cache
    }

    // == Compute ==
    /// Returns `op(a, b)`, computing it only on a cache miss.
    ///
    /// Invalid operands (division by zero) fail before the simulated
    /// latency, and the failure is not cached.
    pub async fn compute(&self, op: Operation, a: f64, b: f64) -> Result<Calculation, LoadError> {
        let latency = self.latency;
        let key = CalcKey::new(op, a, b);
        let (result, lookup) = self
            .cache
            .get_or_compute_traced(key, || async move {
                // Operands come from the key, so -0.0 and 0.0 share one result
                let (a, b) = key.operands();
                let op = key.op();
                info!(%op, a, b, "Computing");
                let result = op.apply(a, b)?;
                tokio::time::sleep(latency).await;
                Ok::<_, CalcError>(result)
            })
            .await?;

        Ok(Calculation { result, lookup })
    }

    // == Evict ==
    /// Drops cached results for the operand pair.
    ///
    /// With `op` set only that operation's entry is removed; otherwise the
    /// entries of every operation are. Returns how many entries were removed.
    pub fn evict(&self, a: f64, b: f64, op: Option<Operation>) -> usize {
        let removed = match op {
            Some(op) => usize::from(self.cache.evict(&CalcKey::new(op, a, b))),
            None => Operation::ALL
                .into_iter()
                .filter(|op| self.cache.evict(&CalcKey::new(*op, a, b)))
                .count(),
        };
        info!(a, b, removed, "Cache entries evicted");
        removed
    }

    // == Clear ==
    pub fn clear(&self) {
        self.cache.clear();
        info!("Calculation cache cleared");
    }
}
