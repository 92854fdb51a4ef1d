//! Group Registry Module
//!
//! Name-to-group mapping owned by the process bootstrap and passed by
//! reference to whatever creates or looks up groups. Mutated only at
//! group-creation time, read thereafter.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::group::{Group, Loader};

// == Group Registry ==
/// Explicitly constructed registry of named groups.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    // == Constructor ==
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // == New Group ==
    /// Creates a group and registers it under `name`.
    ///
    /// Registering a name again replaces the previous group; callers that
    /// need the old one must have kept their own handle to it.
    pub fn new_group(&self, name: &str, cache_bytes: u64, loader: Arc<dyn Loader>) -> Arc<Group> {
        let group = Arc::new(Group::new(name, cache_bytes, loader));
        let mut groups = self.groups.write().expect("registry lock poisoned");
        groups.insert(name.to_string(), group.clone());
        info!(%name, cache_bytes, "group registered");
        group
    }

    // == Lookup ==
    /// Returns the group registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        let groups = self.groups.read().expect("registry lock poisoned");
        groups.get(name).cloned()
    }

    /// Returns the number of registered groups.
    pub fn len(&self) -> usize {
        let groups = self.groups.read().expect("registry lock poisoned");
        groups.len()
    }

    /// Returns true if no group has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn null_loader() -> Arc<dyn Loader> {
        Arc::new(|_key: &str| -> anyhow::Result<Vec<u8>> { Ok(Vec::new()) })
    }

    #[test]
    fn test_registry_starts_empty() {
        let registry = GroupRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("anything").is_none());
    }

    #[test]
    fn test_new_group_is_reachable_by_name() {
        let registry = GroupRegistry::new();
        let created = registry.new_group("scores", 1024, null_loader());

        let found = registry.get("scores").expect("group should be registered");
        assert_eq!(found.name(), "scores");
        assert!(Arc::ptr_eq(&created, &found));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_name_returns_none() {
        let registry = GroupRegistry::new();
        registry.new_group("scores", 1024, null_loader());

        assert!(registry.get("other").is_none());
    }

    #[test]
    fn test_reregistration_overwrites() {
        let registry = GroupRegistry::new();
        let first = registry.new_group("scores", 1024, null_loader());
        let second = registry.new_group("scores", 2048, null_loader());

        let found = registry.get("scores").unwrap();
        assert!(Arc::ptr_eq(&second, &found));
        assert!(!Arc::ptr_eq(&first, &found));
        assert_eq!(registry.len(), 1);
    }
}
