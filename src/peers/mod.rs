//! Peer Capabilities Module
//!
//! Narrow interfaces the group depends on for remote delegation: picking
//! the peer that owns a key, and fetching a value from that peer. The
//! group never sees how bytes cross the wire.

mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use http::{HttpPeerClient, HttpPeerPool, DEFAULT_BASE_PATH, DEFAULT_REPLICAS};

// == Peer Fetcher ==
/// Fetches the value for `(group, key)` from one remote peer.
#[async_trait]
pub trait PeerFetcher: Send + Sync {
    async fn fetch(&self, group: &str, key: &str) -> Result<Vec<u8>>;
}

// == Peer Picker ==
/// Routes a key to the fetcher for its owning peer.
///
/// Returns `None` when no peer owns the key or the owner is this node,
/// in which case the caller loads locally.
pub trait PeerPicker: Send + Sync {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerFetcher>>;
}
