//! API Handlers
//!
//! HTTP request handlers for each cache node endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::{CacheError, Result};
use crate::group::GroupRegistry;
use crate::models::{HealthResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registry of every group this node serves
    pub registry: Arc<GroupRegistry>,
}

impl AppState {
    /// Creates a new AppState over the given registry.
    pub fn new(registry: Arc<GroupRegistry>) -> Self {
        Self { registry }
    }
}

/// Handler for GET /_cache/:group/:key
///
/// The peer wire endpoint: serves the value for a key in a group as a raw
/// octet-stream body. An unknown group maps to 404; a loader failure to
/// 500; a peer-side miss is indistinguishable from a load because the
/// group falls through to its authoritative source.
pub async fn fetch_handler(
    State(state): State<AppState>,
    Path((group, key)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let group = state
        .registry
        .get(&group)
        .ok_or_else(|| CacheError::GroupNotFound(group.clone()))?;

    let value = group.get(&key).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        value.to_bytes(),
    ))
}

/// Handler for GET /stats/:group
///
/// Returns the group's counters and cache occupancy.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<StatsResponse>> {
    let group = state
        .registry
        .get(&group)
        .ok_or_else(|| CacheError::GroupNotFound(group.clone()))?;

    Ok(Json(StatsResponse::new(
        group.name(),
        group.cache_len(),
        group.stats(),
    )))
}

/// Handler for GET /health
///
/// Returns health status of the node.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
