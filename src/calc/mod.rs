//! Calculator Module
//!
//! Arithmetic loaders and the cache keys built from request parameters.

mod operation;
mod service;

pub use operation::{CalcError, CalcKey, Operation};
pub use service::{CalcCache, Calculation, CalculatorService, CALCULATIONS_CACHE};
