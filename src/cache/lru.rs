//! LRU Store Module
//!
//! Bounded key-value store with strict least-recently-used eviction,
//! tracked by occupied-byte accounting.
//!
//! Recency order is kept in a doubly-linked list whose nodes live in an
//! arena and are addressed by index rather than by pointer. Two fixed
//! sentinel slots bracket the list: the slot after `HEAD` is the most
//! recently used entry, the slot before `TAIL` the least recently used.
//! A parallel `HashMap` maps each key to its node index, giving O(1)
//! lookup and O(1) promotion.

use std::collections::HashMap;

use crate::cache::ByteView;

// Fixed arena slots for the list sentinels.
const HEAD: usize = 0;
const TAIL: usize = 1;

/// Callback invoked once per evicted entry with the evicted key and value.
pub type EvictionHook = Box<dyn FnMut(&str, &ByteView) + Send>;

// == Arena Node ==
#[derive(Debug, Default)]
struct Node {
    key: String,
    value: ByteView,
    prev: usize,
    next: usize,
}

// == LRU Store ==
/// Byte-bounded LRU store.
///
/// A capacity of zero disables eviction entirely; the store then grows
/// without bound, which is the intended no-limit mode for in-process use.
pub struct LruStore {
    /// Maximum bytes the store may hold (0 = unbounded)
    capacity_bytes: u64,
    /// Sum of `key.len() + value.len()` over all live entries
    used_bytes: u64,
    /// Node arena; slots 0 and 1 are the head/tail sentinels
    nodes: Vec<Node>,
    /// Recycled arena slots
    free: Vec<usize>,
    /// Key to arena-slot index
    index: HashMap<String, usize>,
    /// Optional hook fired once per eviction
    on_evicted: Option<EvictionHook>,
}

impl LruStore {
    // == Constructor ==
    /// Creates a new store with the given byte capacity and optional
    /// eviction hook.
    pub fn new(capacity_bytes: u64, on_evicted: Option<EvictionHook>) -> Self {
        let head = Node {
            prev: HEAD,
            next: TAIL,
            ..Node::default()
        };
        let tail = Node {
            prev: HEAD,
            next: TAIL,
            ..Node::default()
        };
        Self {
            capacity_bytes,
            used_bytes: 0,
            nodes: vec![head, tail],
            free: Vec::new(),
            index: HashMap::new(),
            on_evicted,
        }
    }

    // == Get ==
    /// Looks up a key, promoting the entry to most-recently-used on a hit.
    pub fn get(&mut self, key: &str) -> Option<ByteView> {
        let idx = *self.index.get(key)?;
        self.detach(idx);
        self.attach_front(idx);
        Some(self.nodes[idx].value.clone())
    }

    // == Insert ==
    /// Inserts or replaces an entry, then evicts least-recently-used
    /// entries while the store is over a nonzero capacity.
    pub fn insert(&mut self, key: String, value: ByteView) {
        if let Some(&idx) = self.index.get(&key) {
            // Replace in place, adjust accounting by the length delta
            let old_len = self.nodes[idx].value.len() as u64;
            self.used_bytes = self.used_bytes - old_len + value.len() as u64;
            self.nodes[idx].value = value;
            self.detach(idx);
            self.attach_front(idx);
        } else {
            self.used_bytes += (key.len() + value.len()) as u64;
            let idx = self.alloc(Node {
                key: key.clone(),
                value,
                prev: HEAD,
                next: TAIL,
            });
            self.index.insert(key, idx);
            self.attach_front(idx);
        }

        while self.capacity_bytes != 0 && self.used_bytes > self.capacity_bytes {
            self.remove_oldest();
        }
    }

    // == Remove Oldest ==
    /// Evicts exactly the least-recently-used entry; no-op when empty.
    pub fn remove_oldest(&mut self) {
        let idx = self.nodes[TAIL].prev;
        if idx == HEAD {
            return;
        }

        self.detach(idx);
        let key = std::mem::take(&mut self.nodes[idx].key);
        let value = std::mem::take(&mut self.nodes[idx].value);
        self.index.remove(&key);
        self.free.push(idx);
        self.used_bytes -= (key.len() + value.len()) as u64;

        if let Some(hook) = self.on_evicted.as_mut() {
            hook(&key, &value);
        }
    }

    // == Length ==
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Accounting ==
    /// Returns the bytes currently occupied by live entries.
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    /// Returns the configured byte capacity (0 = unbounded).
    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_bytes
    }

    // == List Plumbing ==
    fn alloc(&mut self, node: Node) -> usize {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx] = node;
            idx
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    /// Unlinks a node from the recency list, leaving its slot intact.
    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    /// Links a node in at the most-recently-used position.
    fn attach_front(&mut self, idx: usize) {
        let first = self.nodes[HEAD].next;
        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[HEAD].next = idx;
    }
}

impl std::fmt::Debug for LruStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruStore")
            .field("capacity_bytes", &self.capacity_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("entries", &self.index.len())
            .finish()
    }
}
