//! Response DTOs for the calculator API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Serialize, Serializer};

use crate::cache::CacheStats;
use crate::calc::{Calculation, Operation};

/// Writes finite numbers as JSON numbers and the rest as "Infinity",
/// "-Infinity" or "NaN", which JSON numbers cannot express.
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_sign_positive() {
        serializer.serialize_str("Infinity")
    } else {
        serializer.serialize_str("-Infinity")
    }
}

/// Response body for the binary operations (`GET /calc/{op}`)
#[derive(Debug, Clone, Serialize)]
pub struct CalcResponse {
    #[serde(serialize_with = "serialize_number")]
    pub a: f64,
    #[serde(serialize_with = "serialize_number")]
    pub b: f64,
    #[serde(serialize_with = "serialize_number")]
    pub result: f64,
    /// Wall time spent answering the request
    pub duration_ms: u64,
    /// True when the result came from a live cache entry
    pub cached: bool,
    pub operation: &'static str,
}

impl CalcResponse {
    pub fn new(op: Operation, a: f64, b: f64, calc: Calculation, duration_ms: u64) -> Self {
        Self {
            a,
            b,
            result: calc.result,
            duration_ms,
            cached: calc.lookup.is_hit(),
            operation: op.label(),
        }
    }
}

/// Response body for `GET /calc/power`
#[derive(Debug, Clone, Serialize)]
pub struct PowerResponse {
    #[serde(serialize_with = "serialize_number")]
    pub base: f64,
    #[serde(serialize_with = "serialize_number")]
    pub exponent: f64,
    #[serde(serialize_with = "serialize_number")]
    pub result: f64,
    pub duration_ms: u64,
    pub cached: bool,
    pub operation: &'static str,
}

impl PowerResponse {
    pub fn new(base: f64, exponent: f64, calc: Calculation, duration_ms: u64) -> Self {
        Self {
            base,
            exponent,
            result: calc.result,
            duration_ms,
            cached: calc.lookup.is_hit(),
            operation: Operation::Power.label(),
        }
    }
}

/// Response body for `DELETE /calc/evict`
#[derive(Debug, Clone, Serialize)]
pub struct EvictResponse {
    pub message: String,
    #[serde(serialize_with = "serialize_number")]
    pub a: f64,
    #[serde(serialize_with = "serialize_number")]
    pub b: f64,
    /// Number of entries actually removed
    pub removed: usize,
}

impl EvictResponse {
    pub fn new(a: f64, b: f64, removed: usize) -> Self {
        Self {
            message: "Cache entry evicted".to_string(),
            a,
            b,
            removed,
        }
    }
}

/// Response body for the clear endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn new(cache: &str) -> Self {
        Self {
            message: format!("Cache '{}' cleared", cache),
        }
    }
}

/// Per-cache statistics (`GET /cache/stats`)
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub hit_count: u64,
    pub miss_count: u64,
    /// Hit rate as a percentage, e.g. "94.00%"
    pub hit_rate: String,
    pub miss_rate: String,
    pub load_success_count: u64,
    pub load_failure_count: u64,
    pub eviction_count: u64,
    pub size: usize,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_count: stats.hit_count,
            miss_count: stats.miss_count,
            hit_rate: stats.hit_rate_percent(),
            miss_rate: stats.miss_rate_percent(),
            load_success_count: stats.load_success_count,
            load_failure_count: stats.load_failure_count,
            eviction_count: stats.eviction_count,
            size: stats.estimated_size,
        }
    }
}

/// Response body for `GET /cache/names`
#[derive(Debug, Clone, Serialize)]
pub struct NamesResponse {
    pub caches: Vec<String>,
    pub count: usize,
}

impl NamesResponse {
    pub fn new(caches: Vec<String>) -> Self {
        Self {
            count: caches.len(),
            caches,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Lookup;

    #[test]
    fn test_calc_response_cached_flag() {
        let hit = Calculation {
            result: 30.0,
            lookup: Lookup::Hit,
        };
        let joined = Calculation {
            result: 30.0,
            lookup: Lookup::Joined,
        };

        assert!(CalcResponse::new(Operation::Add, 10.0, 20.0, hit, 1).cached);
        assert!(!CalcResponse::new(Operation::Add, 10.0, 20.0, joined, 1900).cached);
    }

    #[test]
    fn test_calc_response_serialize() {
        let calc = Calculation {
            result: 30.0,
            lookup: Lookup::Loaded,
        };
        let json = serde_json::to_value(CalcResponse::new(Operation::Add, 10.0, 20.0, calc, 2001))
            .unwrap();
        assert_eq!(json["result"], 30.0);
        assert_eq!(json["operation"], "addition");
        assert_eq!(json["duration_ms"], 2001);
        assert_eq!(json["cached"], false);
    }

    #[test]
    fn test_power_response_serialize() {
        let calc = Calculation {
            result: 1024.0,
            lookup: Lookup::Hit,
        };
        let json = serde_json::to_value(PowerResponse::new(2.0, 10.0, calc, 0)).unwrap();
        assert_eq!(json["base"], 2.0);
        assert_eq!(json["exponent"], 10.0);
        assert_eq!(json["operation"], "power");
    }

    #[test]
    fn test_stats_response_rates() {
        let stats = CacheStats {
            hit_count: 47,
            miss_count: 3,
            load_success_count: 3,
            estimated_size: 3,
            ..CacheStats::default()
        };
        let resp = CacheStatsResponse::from(stats);
        assert_eq!(resp.hit_rate, "94.00%");
        assert_eq!(resp.miss_rate, "6.00%");
        assert_eq!(resp.size, 3);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = CacheStatsResponse::from(CacheStats::new());
        assert_eq!(resp.hit_rate, "0.00%");
        assert_eq!(resp.miss_rate, "0.00%");
    }

    #[test]
    fn test_names_response() {
        let resp = NamesResponse::new(vec!["calculations".to_string()]);
        assert_eq!(resp.count, 1);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_non_finite_results_serialize_as_strings() {
        let calc = |result| Calculation {
            result,
            lookup: Lookup::Loaded,
        };

        let inf = serde_json::to_value(PowerResponse::new(0.0, -1.0, calc(f64::INFINITY), 0))
            .unwrap();
        assert_eq!(inf["result"], "Infinity");
        assert_eq!(inf["base"], 0.0);

        let neg = serde_json::to_value(CalcResponse::new(
            Operation::Multiply,
            -1e308,
            10.0,
            calc(f64::NEG_INFINITY),
            0,
        ))
        .unwrap();
        assert_eq!(neg["result"], "-Infinity");

        let nan = serde_json::to_value(PowerResponse::new(-8.0, 0.5, calc(f64::NAN), 0)).unwrap();
        assert_eq!(nan["result"], "NaN");
    }
}
