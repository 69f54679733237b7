//! API Routes
//!
//! Configures the Axum router with all calculator and cache endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_handler, clear_handler, clear_named_handler, divide_handler, evict_handler,
    health_handler, multiply_handler, names_handler, power_handler, stats_handler,
    subtract_handler, summary_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /calc/{add,subtract,multiply,divide}?a=&b=` - Cached arithmetic
/// - `GET /calc/power?base=&exponent=` - Cached exponentiation
/// - `DELETE /calc/evict?a=&b=[&op=]` - Evict cached results for a pair
/// - `DELETE /calc/clear` - Clear the calculations cache
/// - `GET /cache/stats` - Per-cache statistics
/// - `GET /cache/summary` - Totals across all caches
/// - `GET /cache/names` - Registered cache names
/// - `DELETE /cache/:name` - Clear a named cache
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/calc/add", get(add_handler))
        .route("/calc/subtract", get(subtract_handler))
        .route("/calc/multiply", get(multiply_handler))
        .route("/calc/divide", get(divide_handler))
        .route("/calc/power", get(power_handler))
        .route("/calc/evict", delete(evict_handler))
        .route("/calc/clear", delete(clear_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/summary", get(summary_handler))
        .route("/cache/names", get(names_handler))
        .route("/cache/:name", delete(clear_named_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
