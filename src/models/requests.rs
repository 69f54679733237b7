//! Request DTOs for the calculator API
//!
//! Query-string parameters accepted by the endpoints.

use serde::Deserialize;

use crate::calc::Operation;

/// Query for the binary operations (`GET /calc/add?a=10&b=20`)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OperandsQuery {
    pub a: f64,
    pub b: f64,
}

/// Query for `GET /calc/power?base=2&exponent=10`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PowerQuery {
    pub base: f64,
    pub exponent: f64,
}

/// Query for `DELETE /calc/evict?a=10&b=20[&op=add]`
#[derive(Debug, Clone, Deserialize)]
pub struct EvictQuery {
    pub a: f64,
    pub b: f64,
    /// Restricts eviction to one operation
    #[serde(default)]
    pub op: Option<String>,
}

impl EvictQuery {
    /// Parses the optional operation filter.
    ///
    /// Returns an error message for unknown operation names.
    pub fn operation(&self) -> Result<Option<Operation>, String> {
        self.op.as_deref().map(str::parse).transpose()
    }
}
