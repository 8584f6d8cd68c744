//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::loader::LoadError;
use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for cache operations and the HTTP layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Id absent from the snapshot, or the snapshot has expired
    #[error("Not found: {0}")]
    NotFound(String),

    /// The loader failed during refresh; cached data was left untouched
    #[error("Loader failed while refreshing cache '{cache}': {source}")]
    LoaderFailure {
        cache: String,
        #[source]
        source: LoadError,
    },

    /// Malformed filter arguments
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    pub(crate) fn loader_failure(cache: &str, source: LoadError) -> Self {
        CacheError::LoaderFailure {
            cache: cache.to_string(),
            source,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            CacheError::LoaderFailure { .. } => StatusCode::BAD_GATEWAY,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
