//! Collection graph and fallback lookup
//!
//! Collections reference each other through fallback lists, forming a graph
//! that may contain cycles. A lookup walks the graph depth-first in list
//! order and remembers every collection it has entered, so each collection
//! is searched at most once per lookup and cycles simply end a branch.

use std::collections::HashSet;

use super::collection::AssetCollection;
use super::AssetError;
use crate::foundation::collections::{CollectionKey, HandleMap};

/// Every collection of one record type, plus the global fallback list
#[derive(Debug, Clone)]
pub struct AssetLibrary<R> {
    collections: HandleMap<CollectionKey, AssetCollection<R>>,
    global_fallbacks: Vec<CollectionKey>,
}

impl<R> Default for AssetLibrary<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> AssetLibrary<R> {
    /// Create an empty library
    pub fn new() -> Self {
        Self {
            collections: HandleMap::with_key(),
            global_fallbacks: Vec::new(),
        }
    }

    /// Add a collection and return its handle
    pub fn add_collection(&mut self, collection: AssetCollection<R>) -> CollectionKey {
        log::debug!("Added asset collection '{}' ({} records)", collection.name(), collection.len());
        self.collections.insert(collection)
    }

    /// Borrow a collection
    pub fn collection(&self, key: CollectionKey) -> Option<&AssetCollection<R>> {
        self.collections.get(key)
    }

    /// Mutably borrow a collection
    pub fn collection_mut(&mut self, key: CollectionKey) -> Option<&mut AssetCollection<R>> {
        self.collections.get_mut(key)
    }

    /// Handle of the first collection named `name`
    pub fn find(&self, name: &str) -> Option<CollectionKey> {
        self.collections
            .iter()
            .find(|(_, collection)| collection.name() == name)
            .map(|(key, _)| key)
    }

    /// Number of collections
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether the library has no collections
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Iterate over all collections
    pub fn iter(&self) -> impl Iterator<Item = (CollectionKey, &AssetCollection<R>)> {
        self.collections.iter()
    }

    /// Make `collection` fall back to `fallback`
    pub fn add_fallback(&mut self, collection: CollectionKey, fallback: CollectionKey) -> Result<(), AssetError> {
        if !self.collections.contains_key(fallback) {
            return Err(AssetError::UnknownCollection(format!("{fallback:?}")));
        }
        self.collections
            .get_mut(collection)
            .ok_or_else(|| AssetError::UnknownCollection(format!("{collection:?}")))?
            .push_fallback(fallback);
        Ok(())
    }

    /// Search `collection` after every label's own collections
    ///
    /// Registering the same collection twice has no effect.
    pub fn register_global_fallback(&mut self, collection: CollectionKey) -> Result<(), AssetError> {
        if !self.collections.contains_key(collection) {
            return Err(AssetError::UnknownCollection(format!("{collection:?}")));
        }
        if !self.global_fallbacks.contains(&collection) {
            self.global_fallbacks.push(collection);
        }
        Ok(())
    }

    /// Globally registered fallbacks, in search order
    pub fn global_fallbacks(&self) -> &[CollectionKey] {
        &self.global_fallbacks
    }

    /// Resolve `name` from a label's `local` collections, then the global
    /// fallbacks
    ///
    /// The first collection holding `name` wins. Handles that no longer exist
    /// are skipped.
    pub fn lookup(&self, name: &str, local: &[CollectionKey]) -> Option<&R> {
        let mut visited = HashSet::new();
        self.search(name, local, &mut visited)
            .or_else(|| self.search(name, &self.global_fallbacks, &mut visited))
    }

    fn search(&self, name: &str, keys: &[CollectionKey], visited: &mut HashSet<CollectionKey>) -> Option<&R> {
        for &key in keys {
            if !visited.insert(key) {
                continue;
            }
            let Some(collection) = self.collections.get(key) else {
                continue;
            };
            if let Some(record) = collection.try_get(name) {
                return Some(record);
            }
            if let Some(record) = self.search(name, collection.fallbacks(), visited) {
                return Some(record);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::DuplicatePolicy;

    fn collection(name: &str, records: &[(&str, u32)]) -> AssetCollection<u32> {
        let mut collection = AssetCollection::new(name);
        for (record, value) in records {
            collection
                .insert(*record, *value, DuplicatePolicy::Reject)
                .unwrap();
        }
        collection
    }

    #[test]
    fn test_local_before_fallbacks_before_global() {
        let mut library = AssetLibrary::new();
        let global = library.add_collection(collection("global", &[("x", 3), ("y", 30)]));
        let fallback = library.add_collection(collection("fallback", &[("x", 2), ("z", 20)]));
        let local = library.add_collection(collection("local", &[("x", 1)]));
        library.add_fallback(local, fallback).unwrap();
        library.register_global_fallback(global).unwrap();

        assert_eq!(library.lookup("x", &[local]), Some(&1));
        assert_eq!(library.lookup("z", &[local]), Some(&20));
        assert_eq!(library.lookup("y", &[local]), Some(&30));
        assert_eq!(library.lookup("x", &[]), Some(&3));
        assert_eq!(library.lookup("missing", &[local]), None);
    }

    #[test]
    fn test_fallbacks_searched_depth_first_in_order() {
        let mut library = AssetLibrary::new();
        let deep = library.add_collection(collection("deep", &[("x", 3)]));
        let first = library.add_collection(collection("first", &[]));
        let second = library.add_collection(collection("second", &[("x", 2)]));
        let root = library.add_collection(collection("root", &[]));
        library.add_fallback(first, deep).unwrap();
        library.add_fallback(root, first).unwrap();
        library.add_fallback(root, second).unwrap();

        assert_eq!(library.lookup("x", &[root]), Some(&3));
    }

    #[test]
    fn test_cycle_terminates() {
        let mut library = AssetLibrary::new();
        let a = library.add_collection(collection("A", &[]));
        let b = library.add_collection(collection("B", &[]));
        library.add_fallback(a, b).unwrap();
        library.add_fallback(b, a).unwrap();

        assert_eq!(library.lookup("x", &[a]), None);
    }

    #[test]
    fn test_self_cycle_terminates() {
        let mut library = AssetLibrary::new();
        let a = library.add_collection(collection("A", &[]));
        library.add_fallback(a, a).unwrap();
        library.register_global_fallback(a).unwrap();

        assert_eq!(library.lookup("x", &[a]), None);
    }

    #[test]
    fn test_global_registration_is_idempotent() {
        let mut library: AssetLibrary<u32> = AssetLibrary::new();
        let a = library.add_collection(AssetCollection::new("A"));

        library.register_global_fallback(a).unwrap();
        library.register_global_fallback(a).unwrap();
        assert_eq!(library.global_fallbacks(), &[a]);
    }

    #[test]
    fn test_unknown_handles() {
        let mut library: AssetLibrary<u32> = AssetLibrary::new();
        let a = library.add_collection(AssetCollection::new("A"));
        let mut other: AssetLibrary<u32> = AssetLibrary::new();
        other.add_collection(AssetCollection::new("unused"));
        let stale = other.add_collection(AssetCollection::new("stale"));

        assert!(matches!(
            library.add_fallback(a, stale),
            Err(AssetError::UnknownCollection(_))
        ));
        assert!(library.register_global_fallback(stale).is_err());
        assert_eq!(library.lookup("x", &[stale]), None);
        assert_eq!(library.find("A"), Some(a));
        assert_eq!(library.find("B"), None);
    }
}
