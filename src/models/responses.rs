//! Response DTOs for the node's HTTP API
//!
//! Defines the structure of outgoing JSON response bodies.

use serde::Serialize;

use crate::cache::StatsSnapshot;

/// Response body for the stats endpoint (GET /stats/:group)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// The group these counters belong to
    pub group: String,
    /// Entries currently held in the local cache
    pub cached_entries: usize,
    /// Local cache hits
    pub hits: u64,
    /// Local cache misses
    pub misses: u64,
    /// Values served by a remote peer
    pub peer_hits: u64,
    /// Failed peer fetches that fell back to the loader
    pub peer_errors: u64,
    /// Authoritative loader invocations
    pub loads: u64,
    /// Entries evicted from the local cache
    pub evictions: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a group's counters.
    pub fn new(group: impl Into<String>, cached_entries: usize, snap: StatsSnapshot) -> Self {
        Self {
            group: group.into(),
            cached_entries,
            hits: snap.hits,
            misses: snap.misses,
            peer_hits: snap.peer_hits,
            peer_errors: snap.peer_errors,
            loads: snap.loads,
            evictions: snap.evictions,
            hit_rate: snap.hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the node is serving
    pub status: String,
    /// Unix timestamp in seconds
    pub timestamp: u64,
}

impl HealthResponse {
    /// Creates a healthy response stamped with the current time.
    pub fn healthy() -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            status: "healthy".to_string(),
            timestamp,
        }
    }
}
