//! Consistent Hash Ring Module
//!
//! Maps arbitrary keys to owning peer identifiers. Each peer is placed on
//! the ring at several virtual points so load spreads evenly; a key is
//! owned by the peer at the first ring point clockwise from the key's own
//! hash, wrapping past the highest point back to the lowest.

use std::collections::HashMap;

/// Hash function over raw bytes, injectable for deterministic tests.
pub type HashFn = Box<dyn Fn(&[u8]) -> u32 + Send + Sync>;

// == Hash Ring ==
/// Consistent-hashing ring with virtual-node load smoothing.
pub struct HashRing {
    /// Virtual points per peer
    replicas: usize,
    /// Hash function; defaults to CRC32
    hash: HashFn,
    /// All virtual points, kept sorted ascending
    points: Vec<u32>,
    /// Virtual point to owning peer id
    owners: HashMap<u32, String>,
}

impl HashRing {
    // == Constructors ==
    /// Creates an empty ring using CRC32 as the hash function.
    pub fn new(replicas: usize) -> Self {
        Self::with_hash(replicas, Box::new(crc32fast::hash))
    }

    /// Creates an empty ring with a custom hash function.
    pub fn with_hash(replicas: usize, hash: HashFn) -> Self {
        Self {
            replicas,
            hash,
            points: Vec::new(),
            owners: HashMap::new(),
        }
    }

    // == Add Nodes ==
    /// Places each peer on the ring at `replicas` virtual points.
    ///
    /// A virtual point is the hash of the replica index concatenated with
    /// the peer id. The point list is re-sorted once per batch.
    pub fn add_nodes<S: AsRef<str>>(&mut self, peers: &[S]) {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let point = (self.hash)(format!("{}{}", i, peer).as_bytes());
                self.points.push(point);
                self.owners.insert(point, peer.to_string());
            }
        }
        self.points.sort_unstable();
    }

    // == Owner Lookup ==
    /// Returns the peer owning `key`, or `None` on an empty ring.
    ///
    /// Binary-searches for the first point at or after the key's hash;
    /// a key hashing past the highest point wraps to the first one.
    pub fn owner(&self, key: &str) -> Option<&str> {
        if self.points.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.points.partition_point(|&point| point < hash);
        let point = self.points[idx % self.points.len()];
        self.owners.get(&point).map(String::as_str)
    }

    // == Introspection ==
    /// Returns true if no peer has been added.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the number of virtual points on the ring.
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("points", &self.points.len())
            .finish()
    }
}
