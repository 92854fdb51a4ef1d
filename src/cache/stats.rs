//! Cache Statistics Module
//!
//! Tracks per-group performance counters: local hits and misses, peer
//! fetches, and authoritative loads. Counters are atomics so the group's
//! get path can record events without taking the cache lock.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Group Stats ==
/// Atomic per-group counters.
#[derive(Debug, Default)]
pub struct GroupStats {
    /// Local cache hits
    hits: AtomicU64,
    /// Local cache misses
    misses: AtomicU64,
    /// Values served by a remote peer
    peer_hits: AtomicU64,
    /// Failed peer fetches that fell back to the loader
    peer_errors: AtomicU64,
    /// Authoritative loader invocations
    loads: AtomicU64,
    /// Entries evicted from the local cache
    evictions: AtomicU64,
}

/// A point-in-time copy of a group's counters, as served by the stats
/// endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub peer_hits: u64,
    pub peer_errors: u64,
    pub loads: u64,
    pub evictions: u64,
    /// hits / (hits + misses), 0.0 before any lookup
    pub hit_rate: f64,
}

impl GroupStats {
    // == Constructor ==
    /// Creates a new stats block with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Recorders ==
    /// Records a local cache hit.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a local cache miss.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a value served by a remote peer.
    pub fn record_peer_hit(&self) {
        self.peer_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a failed peer fetch.
    pub fn record_peer_error(&self) {
        self.peer_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an authoritative loader invocation.
    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an entry evicted from the local cache.
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Returns a consistent-enough copy of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        StatsSnapshot {
            hits,
            misses,
            peer_hits: self.peer_hits.load(Ordering::Relaxed),
            peer_errors: self.peer_errors.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            hit_rate: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
        }
    }
}
