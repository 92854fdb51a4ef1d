//! Cache Module
//!
//! Provides the local caching layer: the immutable byte payload, the
//! byte-bounded LRU store, the lock guarding it, and per-group counters.

mod byte_view;
mod guard;
mod lru;
mod stats;


// Re-export public types
pub use byte_view::ByteView;
pub use guard::CacheGuard;
pub use lru::{EvictionHook, LruStore};
pub use stats::{GroupStats, StatsSnapshot};
