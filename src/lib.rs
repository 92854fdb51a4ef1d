//! Peercache - a peer-replicated read-through cache
//!
//! Each node owns a disjoint partition of keys via consistent hashing,
//! serves reads from a bounded local LRU cache, falls back to the owning
//! peer over HTTP, and finally to an authoritative loader on a total miss.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod peers;
pub mod ring;

pub use api::AppState;
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Group, GroupRegistry, Loader};
pub use peers::{HttpPeerPool, PeerFetcher, PeerPicker};
pub use ring::HashRing;
