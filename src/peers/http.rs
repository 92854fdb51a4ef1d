//! HTTP Peer Transport
//!
//! Implements the peer capabilities over plain HTTP: a pool that routes
//! keys to peer addresses via the consistent-hash ring, and a client that
//! fetches `GET <peer><base_path>/<group>/<key>` with reqwest.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::peers::{PeerFetcher, PeerPicker};
use crate::ring::HashRing;

/// Path prefix under which every node serves its peer endpoint.
pub const DEFAULT_BASE_PATH: &str = "/_cache";

/// Virtual points per peer on the routing ring.
pub const DEFAULT_REPLICAS: usize = 50;

// == HTTP Peer Client ==
/// Fetches values from one remote peer over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPeerClient {
    /// Peer endpoint prefix, e.g. "http://localhost:9081/_cache"
    base_url: String,
    http: reqwest::Client,
}

impl HttpPeerClient {
    /// Creates a client for the peer at `addr`, sharing the given
    /// reqwest client.
    pub fn new(addr: &str, base_path: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: format!("{}{}", addr.trim_end_matches('/'), base_path),
            http,
        }
    }
}

#[async_trait]
impl PeerFetcher for HttpPeerClient {
    async fn fetch(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key)
        );
        debug!(%url, "fetching from peer");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CacheError::PeerFetch(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(CacheError::PeerFetch(format!(
                "peer returned {} for {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CacheError::PeerFetch(format!("reading body from {}: {}", url, e)))?;
        Ok(bytes.to_vec())
    }
}

// == Routing State ==
/// Ring plus per-peer clients, swapped atomically on membership updates.
#[derive(Debug)]
struct PoolState {
    ring: HashRing,
    clients: HashMap<String, Arc<HttpPeerClient>>,
}

// == HTTP Peer Pool ==
/// Routes keys to peers and hands out the matching fetcher.
///
/// The routing lock is scoped to this pool and independent of any
/// group's cache lock.
#[derive(Debug)]
pub struct HttpPeerPool {
    /// This node's own peer address; keys it owns are loaded locally
    self_addr: String,
    base_path: String,
    http: reqwest::Client,
    state: RwLock<PoolState>,
}

impl HttpPeerPool {
    // == Constructor ==
    /// Creates a pool for the node reachable at `self_addr`.
    pub fn new(self_addr: &str) -> Self {
        Self {
            self_addr: self_addr.trim_end_matches('/').to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            http: reqwest::Client::new(),
            state: RwLock::new(PoolState {
                ring: HashRing::new(DEFAULT_REPLICAS),
                clients: HashMap::new(),
            }),
        }
    }

    // == Set Peers ==
    /// Replaces the full peer set, atomically rebuilding the ring and the
    /// per-peer client table under the routing lock.
    pub fn set_peers<S: AsRef<str>>(&self, peers: &[S]) {
        let mut ring = HashRing::new(DEFAULT_REPLICAS);
        let addrs: Vec<String> = peers
            .iter()
            .map(|p| p.as_ref().trim_end_matches('/').to_string())
            .collect();
        ring.add_nodes(&addrs);

        let clients = addrs
            .iter()
            .map(|addr| {
                let client = HttpPeerClient::new(addr, &self.base_path, self.http.clone());
                (addr.clone(), Arc::new(client))
            })
            .collect();

        let mut state = self.state.write().expect("peer pool lock poisoned");
        state.ring = ring;
        state.clients = clients;
        debug!(peers = addrs.len(), "peer set replaced");
    }
}

impl PeerPicker for HttpPeerPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerFetcher>> {
        let state = self.state.read().expect("peer pool lock poisoned");
        let owner = state.ring.owner(key)?;
        if owner == self.self_addr {
            return None;
        }
        debug!(%key, %owner, "key owned by remote peer");
        state
            .clients
            .get(owner)
            .cloned()
            .map(|client| client as Arc<dyn PeerFetcher>)
    }
}
