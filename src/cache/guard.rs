//! Cache Guard Module
//!
//! Serializes all access to one group's local LRU store behind a single
//! exclusive lock. The underlying store is built lazily on first insert
//! with the capacity configured at group creation, so a group whose keys
//! are always served remotely never allocates a store at all.

use std::sync::Mutex;

use crate::cache::{ByteView, EvictionHook, LruStore};

// State behind the guard lock: the store once built, and the hook held
// back until that build happens.
#[derive(Default)]
struct GuardInner {
    store: Option<LruStore>,
    on_evicted: Option<EvictionHook>,
}

// == Cache Guard ==
/// Thread-safe wrapper around one lazily-initialized [`LruStore`].
///
/// The lock is only ever held for the duration of a single store
/// operation and never across an await point.
pub struct CacheGuard {
    /// Capacity handed to the store when it is first built
    capacity_bytes: u64,
    inner: Mutex<GuardInner>,
}

impl CacheGuard {
    // == Constructors ==
    /// Creates a guard whose store, once built, holds at most
    /// `capacity_bytes` bytes (0 = unbounded).
    pub fn new(capacity_bytes: u64) -> Self {
        Self::with_eviction_hook(capacity_bytes, None)
    }

    /// Creates a guard that hands the given hook to the store when it is
    /// built; the hook then fires once per evicted entry.
    pub fn with_eviction_hook(capacity_bytes: u64, on_evicted: Option<EvictionHook>) -> Self {
        Self {
            capacity_bytes,
            inner: Mutex::new(GuardInner {
                store: None,
                on_evicted,
            }),
        }
    }

    // == Get ==
    /// Looks up a key. Returns `None` if the store has not been built yet
    /// or the key is absent.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock().expect("cache guard lock poisoned");
        inner.store.as_mut()?.get(key)
    }

    // == Insert ==
    /// Writes an entry through the guard, building the store on first use.
    pub fn insert(&self, key: String, value: ByteView) {
        let mut inner = self.inner.lock().expect("cache guard lock poisoned");
        let store = match inner.store {
            Some(ref mut store) => store,
            None => {
                let hook = inner.on_evicted.take();
                inner
                    .store
                    .get_or_insert(LruStore::new(self.capacity_bytes, hook))
            }
        };
        store.insert(key, value);
    }

    // == Length ==
    /// Returns the number of live entries (0 before the store exists).
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().expect("cache guard lock poisoned");
        inner.store.as_ref().map_or(0, |store| store.len())
    }

    /// Returns the bytes currently held (0 before the store exists).
    pub fn used_bytes(&self) -> u64 {
        let inner = self.inner.lock().expect("cache guard lock poisoned");
        inner.store.as_ref().map_or(0, |store| store.used_bytes())
    }
}

impl std::fmt::Debug for CacheGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheGuard")
            .field("capacity_bytes", &self.capacity_bytes)
            .field("entries", &self.len())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_guard_starts_without_store() {
        let guard = CacheGuard::new(1024);
        assert_eq!(guard.get("anything"), None);
        assert_eq!(guard.len(), 0);
        assert_eq!(guard.used_bytes(), 0);
    }

    #[test]
    fn test_guard_builds_store_on_first_insert() {
        let guard = CacheGuard::new(1024);
        guard.insert("key1".to_string(), ByteView::from("value1"));

        assert_eq!(guard.get("key1"), Some(ByteView::from("value1")));
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn test_guard_respects_capacity() {
        let guard = CacheGuard::new(8);
        guard.insert("k1".to_string(), ByteView::from("v1"));
        guard.insert("k2".to_string(), ByteView::from("v2"));
        guard.insert("k3".to_string(), ByteView::from("v3"));

        assert_eq!(guard.get("k1"), None);
        assert_eq!(guard.len(), 2);
    }

    #[test]
    fn test_guard_forwards_eviction_hook_to_lazy_store() {
        let evicted = Arc::new(AtomicUsize::new(0));
        let counter = evicted.clone();
        let hook: EvictionHook = Box::new(move |_key, _value| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let guard = CacheGuard::with_eviction_hook(8, Some(hook));
        guard.insert("k1".to_string(), ByteView::from("v1"));
        guard.insert("k2".to_string(), ByteView::from("v2"));
        assert_eq!(evicted.load(Ordering::SeqCst), 0);

        // Third insert overflows the two-entry capacity and must fire
        // the hook handed over at construction time
        guard.insert("k3".to_string(), ByteView::from("v3"));
        assert_eq!(evicted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_is_usable_across_threads() {
        let guard = Arc::new(CacheGuard::new(0));
        let mut handles = Vec::new();

        for t in 0..4 {
            let guard = guard.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    let key = format!("t{}-{}", t, i);
                    guard.insert(key.clone(), ByteView::from("x"));
                    assert!(guard.get(&key).is_some());
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(guard.len(), 200);
    }
}
