//! Error types for the cache and the calculator server
//!
//! Provides unified error handling using thiserror.

use std::error::Error as StdError;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Boxed loader failure, shared between the owner of a load and its waiters.
pub type SharedCause = Arc<dyn StdError + Send + Sync>;

// == Load Error ==
/// Failure of a `get_or_compute` call.
///
/// Cloneable so one failed load can be handed to every caller waiting on it.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    /// The loader returned an error
    #[error("Load failed: {0}")]
    Failed(#[source] SharedCause),

    /// The caller running the loader went away before it finished
    #[error("Load abandoned before completion")]
    Abandoned,
}

impl LoadError {
    /// Wraps a loader error.
    pub fn failed<E>(cause: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Failed(Arc::from(cause.into()))
    }

    /// Returns the loader's original error, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Self::Failed(cause) => Some(cause.as_ref()),
            Self::Abandoned => None,
        }
    }
}

// == Config Error ==
/// Rejected cache construction parameters.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Cache capacity must be greater than zero")]
    ZeroCapacity,

    #[error("Cache TTL must be greater than zero")]
    ZeroTtl,
}

// == Api Error Enum ==
/// Error type for the HTTP boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Unknown cache name or resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Computing the value failed
    #[error(transparent)]
    Load(#[from] LoadError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Load(LoadError::Failed(_)) => StatusCode::BAD_REQUEST,
            ApiError::Load(LoadError::Abandoned) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
