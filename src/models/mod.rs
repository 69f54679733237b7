//! Request and Response models for the calculator API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! deserializing query strings and serializing HTTP response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{EvictQuery, OperandsQuery, PowerQuery};
pub use responses::{
    CacheStatsResponse, CalcResponse, ClearResponse, EvictResponse, HealthResponse,
    NamesResponse, PowerResponse,
};
