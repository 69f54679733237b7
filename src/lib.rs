//! Calc Cache - A bounded compute-if-absent cache behind a calculator server
//!
//! Provides a concurrent cache with TTL expiry, LRU eviction, singleflight
//! loads and hit/miss statistics, plus the HTTP demo that exercises it.

pub mod api;
pub mod cache;
pub mod calc;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{BoundedCache, CacheStats, Lookup};
pub use config::Config;
pub use error::LoadError;
pub use tasks::spawn_sweeper;
