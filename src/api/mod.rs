//! API Module
//!
//! HTTP handlers and routing for the calculator and its cache statistics.
//!
//! # Endpoints
//! - `GET /calc/{add,subtract,multiply,divide,power}` - Cached calculations
//! - `DELETE /calc/evict`, `DELETE /calc/clear` - Cache administration
//! - `GET /cache/{stats,summary,names}` - Cache reporting
//! - `DELETE /cache/:name` - Clear a named cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
