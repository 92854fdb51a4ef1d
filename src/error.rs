//! Error types for the cache node
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache node.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No group is registered under the requested name
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// Invalid wiring at construction time (e.g. peers registered twice)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The authoritative loader failed for a key.
    ///
    /// This is the only error that crosses the group's public boundary
    /// under normal operation.
    #[error("Failed to load key '{key}' from source: {source}")]
    SourceLoad {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// A remote peer fetch failed.
    ///
    /// Absorbed inside the group's get path, where it triggers fallback to
    /// the authoritative loader; only surfaced if it leaks out of a raw
    /// transport call.
    #[error("Peer fetch failed: {0}")]
    PeerFetch(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::GroupNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            CacheError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            CacheError::SourceLoad { .. } => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            CacheError::PeerFetch(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache node.
pub type Result<T> = std::result::Result<T, CacheError>;
