//! API Handlers
//!
//! HTTP request handlers for the calculator and cache administration
//! endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{CacheRegistry, CacheSummary};
use crate::calc::{CalcCache, CalcKey, CalculatorService, Operation, CALCULATIONS_CACHE};
use crate::config::Config;
use crate::error::{ApiError, ConfigError, Result};
use crate::models::{
    CacheStatsResponse, CalcResponse, ClearResponse, EvictQuery, EvictResponse, HealthResponse,
    NamesResponse, OperandsQuery, PowerQuery, PowerResponse,
};

/// Application state shared across all handlers.
///
/// Built once at startup: the calculator and the registry share the same
/// "calculations" cache instance.
#[derive(Clone)]
pub struct AppState {
    /// Cached calculator
    pub calculator: CalculatorService,
    /// Every named cache, for reporting and administration
    pub registry: Arc<CacheRegistry<CalcKey, f64>>,
}

impl AppState {
    /// Creates a new AppState around the calculator's cache.
    pub fn new(calculator: CalculatorService) -> Self {
        let mut registry = CacheRegistry::new();
        registry.register(CALCULATIONS_CACHE, calculator.cache().clone());
        Self {
            calculator,
            registry: Arc::new(registry),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// # Errors
    /// `ConfigError` if the configured capacity or TTL is zero.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let cache = CalcCache::new(config.max_entries, config.ttl())?;
        let calculator = CalculatorService::new(Arc::new(cache), config.simulated_latency());
        Ok(Self::new(calculator))
    }
}

async fn calculate(state: &AppState, op: Operation, a: f64, b: f64) -> Result<CalcResponse> {
    let start = Instant::now();
    let calc = state.calculator.compute(op, a, b).await?;
    Ok(CalcResponse::new(op, a, b, calc, elapsed_ms(start)))
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Handler for GET /calc/add
pub async fn add_handler(
    State(state): State<AppState>,
    Query(q): Query<OperandsQuery>,
) -> Result<Json<CalcResponse>> {
    calculate(&state, Operation::Add, q.a, q.b).await.map(Json)
}

/// Handler for GET /calc/subtract
pub async fn subtract_handler(
    State(state): State<AppState>,
    Query(q): Query<OperandsQuery>,
) -> Result<Json<CalcResponse>> {
    calculate(&state, Operation::Subtract, q.a, q.b).await.map(Json)
}

/// Handler for GET /calc/multiply
pub async fn multiply_handler(
    State(state): State<AppState>,
    Query(q): Query<OperandsQuery>,
) -> Result<Json<CalcResponse>> {
    calculate(&state, Operation::Multiply, q.a, q.b).await.map(Json)
}

/// Handler for GET /calc/divide
///
/// A zero divisor answers 400 and leaves nothing in the cache.
pub async fn divide_handler(
    State(state): State<AppState>,
    Query(q): Query<OperandsQuery>,
) -> Result<Json<CalcResponse>> {
    calculate(&state, Operation::Divide, q.a, q.b).await.map(Json)
}

/// Handler for GET /calc/power
pub async fn power_handler(
    State(state): State<AppState>,
    Query(q): Query<PowerQuery>,
) -> Result<Json<PowerResponse>> {
    let start = Instant::now();
    let calc = state
        .calculator
        .compute(Operation::Power, q.base, q.exponent)
        .await?;
    Ok(Json(PowerResponse::new(
        q.base,
        q.exponent,
        calc,
        elapsed_ms(start),
    )))
}

/// Handler for DELETE /calc/evict
///
/// Evicting a pair that is not cached still succeeds, with `removed: 0`.
pub async fn evict_handler(
    State(state): State<AppState>,
    Query(q): Query<EvictQuery>,
) -> Result<Json<EvictResponse>> {
    let op = q.operation().map_err(ApiError::InvalidRequest)?;
    let removed = state.calculator.evict(q.a, q.b, op);
    Ok(Json(EvictResponse::new(q.a, q.b, removed)))
}

/// Handler for DELETE /calc/clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.calculator.clear();
    Json(ClearResponse::new(CALCULATIONS_CACHE))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, CacheStatsResponse>> {
    let stats = state
        .registry
        .stats()
        .into_iter()
        .map(|(name, stats)| (name, CacheStatsResponse::from(stats)))
        .collect();
    Json(stats)
}

/// Handler for GET /cache/summary
pub async fn summary_handler(State(state): State<AppState>) -> Json<CacheSummary> {
    Json(state.registry.summary())
}

/// Handler for GET /cache/names
pub async fn names_handler(State(state): State<AppState>) -> Json<NamesResponse> {
    Json(NamesResponse::new(state.registry.names()))
}

/// Handler for DELETE /cache/:name
pub async fn clear_named_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ClearResponse>> {
    if state.registry.clear(&name) {
        Ok(Json(ClearResponse::new(&name)))
    } else {
        Err(ApiError::NotFound(format!("Unknown cache '{}'", name)))
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
