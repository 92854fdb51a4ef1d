//! Group Module
//!
//! A group is a named cache namespace binding one local cache, one
//! authoritative loader, and an optional peer router. `Group::get`
//! sequences the whole read path: local lookup, peer delegation, and
//! authoritative load, populating the local cache on the way out.

mod registry;

use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::cache::{ByteView, CacheGuard, GroupStats, StatsSnapshot};
use crate::error::{CacheError, Result};
use crate::peers::PeerPicker;

pub use registry::GroupRegistry;

// == Loader Capability ==
/// The authoritative data source invoked on a total cache miss.
///
/// Concurrent identical misses each invoke the loader independently
/// (there is no in-flight deduplication), so implementations must be safe
/// to call concurrently and should be idempotent.
pub trait Loader: Send + Sync {
    fn load(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Lets a plain closure act as a [`Loader`].
impl<F> Loader for F
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        self(key)
    }
}

// == Group ==
/// A named cache namespace.
///
/// Immutable after creation except for one-time peer registration.
pub struct Group {
    name: String,
    cache: CacheGuard,
    loader: Arc<dyn Loader>,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    stats: Arc<GroupStats>,
}

impl Group {
    // == Constructor ==
    /// Creates a group; obtain one through [`GroupRegistry::new_group`] so
    /// it is reachable by name.
    pub(crate) fn new(name: &str, cache_bytes: u64, loader: Arc<dyn Loader>) -> Self {
        // The stats block is shared with the cache's eviction hook so
        // evictions show up in the group's counters
        let stats = Arc::new(GroupStats::new());
        let hook_stats = stats.clone();
        let cache = CacheGuard::with_eviction_hook(
            cache_bytes,
            Some(Box::new(move |_key, _value| hook_stats.record_eviction())),
        );

        Self {
            name: name.to_string(),
            cache,
            loader,
            peers: OnceLock::new(),
            stats,
        }
    }

    /// Returns the group's registry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Peer Registration ==
    /// Wires a peer picker into the group. May be called at most once;
    /// a second call is a wiring bug and returns a config error.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers.set(peers).map_err(|_| {
            CacheError::Config(format!(
                "peers registered more than once on group '{}'",
                self.name
            ))
        })
    }

    // == Get ==
    /// Returns the value for `key`, from the local cache, the owning
    /// peer, or the authoritative loader, in that order.
    ///
    /// The empty key short-circuits to an empty value without touching
    /// the cache or the loader.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Ok(ByteView::default());
        }

        if let Some(value) = self.cache.get(key) {
            self.stats.record_hit();
            debug!(group = %self.name, %key, "local cache hit");
            return Ok(value);
        }
        self.stats.record_miss();

        self.load(key).await
    }

    // == Load ==
    /// Miss path: try the owning peer, then fall back to the loader.
    /// Peer failures never reach the caller; they degrade to a local load.
    async fn load(&self, key: &str) -> Result<ByteView> {
        if let Some(peer) = self.peers.get().and_then(|p| p.pick_peer(key)) {
            match peer.fetch(&self.name, key).await {
                Ok(bytes) => {
                    // Peer payload is trusted as-is, no defensive copy
                    let value = ByteView::from_owned(bytes);
                    self.stats.record_peer_hit();
                    self.populate(key, value.clone());
                    return Ok(value);
                }
                Err(err) => {
                    self.stats.record_peer_error();
                    warn!(group = %self.name, %key, %err, "peer fetch failed, loading locally");
                }
            }
        }

        self.load_locally(key)
    }

    /// Invokes the authoritative loader and caches the defensive copy.
    fn load_locally(&self, key: &str) -> Result<ByteView> {
        self.stats.record_load();
        let bytes = self
            .loader
            .load(key)
            .map_err(|source| CacheError::SourceLoad {
                key: key.to_string(),
                source,
            })?;

        let value = ByteView::copy_from(&bytes);
        self.populate(key, value.clone());
        Ok(value)
    }

    /// Writes a freshly obtained value through the cache guard.
    fn populate(&self, key: &str, value: ByteView) {
        self.cache.insert(key.to_string(), value);
    }

    // == Stats ==
    /// Returns a snapshot of the group's counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns the number of locally cached entries.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("cached_entries", &self.cache.len())
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::peers::PeerFetcher;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Loader returning "value-for-<key>" and counting its invocations.
    struct CountingLoader {
        calls: AtomicUsize,
    }

    impl Loader for CountingLoader {
        fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("value-for-{}", key).into_bytes())
        }
    }

    /// Fetcher that always fails, simulating an unreachable peer.
    struct FailingFetcher;

    #[async_trait]
    impl PeerFetcher for FailingFetcher {
        async fn fetch(&self, _group: &str, _key: &str) -> Result<Vec<u8>> {
            Err(CacheError::PeerFetch("peer unreachable".to_string()))
        }
    }

    /// Picker that always routes to the given fetcher.
    struct AlwaysRemote(Arc<dyn PeerFetcher>);

    impl PeerPicker for AlwaysRemote {
        fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerFetcher>> {
            Some(self.0.clone())
        }
    }

    /// Fetcher that returns a fixed payload and counts calls.
    struct FixedFetcher {
        payload: Vec<u8>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PeerFetcher for FixedFetcher {
        async fn fetch(&self, _group: &str, _key: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        }
    }

    fn counting_group(name: &str) -> (Group, Arc<CountingLoader>) {
        let loader = Arc::new(CountingLoader {
            calls: AtomicUsize::new(0),
        });
        let group = Group::new(name, 1024, loader.clone());
        (group, loader)
    }

    #[tokio::test]
    async fn test_empty_key_short_circuits() {
        let (group, loader) = counting_group("t");

        let value = group.get("").await.unwrap();

        assert!(value.is_empty());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 0);
        assert_eq!(group.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_load_once_then_hit() {
        let (group, loader) = counting_group("t");

        let first = group.get("alpha").await.unwrap();
        assert_eq!(first.to_bytes(), b"value-for-alpha");
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);

        let second = group.get("alpha").await.unwrap();
        assert_eq!(second.to_bytes(), b"value-for-alpha");
        // Second get must be served from cache without another load
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);

        let stats = group.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.loads, 1);
    }

    #[tokio::test]
    async fn test_loader_error_propagates() {
        let loader = Arc::new(|key: &str| -> anyhow::Result<Vec<u8>> {
            anyhow::bail!("no such row: {}", key)
        });
        let group = Group::new("t", 1024, loader);

        let err = group.get("missing").await.unwrap_err();
        assert!(matches!(err, CacheError::SourceLoad { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn test_peer_failure_falls_back_to_loader() {
        let (group, loader) = counting_group("t");
        group
            .register_peers(Arc::new(AlwaysRemote(Arc::new(FailingFetcher))))
            .unwrap();

        // The peer always fails, but the caller still gets the loader value
        let value = group.get("beta").await.unwrap();
        assert_eq!(value.to_bytes(), b"value-for-beta");
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);

        let stats = group.stats();
        assert_eq!(stats.peer_errors, 1);
        assert_eq!(stats.loads, 1);
    }

    #[tokio::test]
    async fn test_peer_success_skips_loader_and_populates() {
        let (group, loader) = counting_group("t");
        let fetcher = Arc::new(FixedFetcher {
            payload: b"remote-bytes".to_vec(),
            calls: AtomicUsize::new(0),
        });
        group
            .register_peers(Arc::new(AlwaysRemote(fetcher.clone())))
            .unwrap();

        let value = group.get("gamma").await.unwrap();
        assert_eq!(value.to_bytes(), b"remote-bytes");
        assert_eq!(loader.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

        // The peer result was written through the guard, so the second
        // get is a local hit and the peer is not asked again
        let again = group.get("gamma").await.unwrap();
        assert_eq!(again.to_bytes(), b"remote-bytes");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_evictions_are_counted_in_stats() {
        let loader = Arc::new(|_key: &str| -> anyhow::Result<Vec<u8>> { Ok(b"vv".to_vec()) });
        // Capacity fits two entries of key "kN" + value "vv"
        let group = Group::new("t", 8, loader);

        for key in ["k1", "k2", "k3"] {
            group.get(key).await.unwrap();
        }

        // Loading k3 pushed the store over capacity and evicted k1
        let stats = group.stats();
        assert_eq!(stats.evictions, 1);
        assert_eq!(group.cache_len(), 2);
        assert_eq!(group.get("k1").await.unwrap().to_bytes(), b"vv");
        assert_eq!(group.stats().evictions, 2);
    }

    #[tokio::test]
    async fn test_register_peers_twice_is_config_error() {
        let (group, _) = counting_group("t");
        let picker = || Arc::new(AlwaysRemote(Arc::new(FailingFetcher)));

        group.register_peers(picker()).unwrap();
        let err = group.register_peers(picker()).unwrap_err();
        assert!(matches!(err, CacheError::Config(_)));
    }
}
