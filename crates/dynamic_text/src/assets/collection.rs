//! Named record tables

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::AssetError;
use crate::foundation::collections::CollectionKey;

/// Prefix of names generated for records added without one
pub const DEFAULT_NAME_PREFIX: &str = "key";

/// What to do when a record name is already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Overwrite the existing record
    #[default]
    Replace,
    /// Store under the name with the first free numeric suffix
    Rename,
    /// Fail with [`AssetError::DuplicateName`]
    Reject,
}

/// A table of named records plus the collections searched when a name is
/// missing here
#[derive(Debug, Clone)]
pub struct AssetCollection<R> {
    name: String,
    records: HashMap<String, R>,
    fallbacks: Vec<CollectionKey>,
}

impl<R> AssetCollection<R> {
    /// Create an empty collection
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: HashMap::new(),
            fallbacks: Vec::new(),
        }
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a record in this table only
    pub fn try_get(&self, name: &str) -> Option<&R> {
        self.records.get(name)
    }

    /// Whether this table holds `name`
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.records.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over `(name, record)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &R)> {
        self.records.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Collections searched after this one, in order
    pub fn fallbacks(&self) -> &[CollectionKey] {
        &self.fallbacks
    }

    pub(crate) fn push_fallback(&mut self, fallback: CollectionKey) {
        if !self.fallbacks.contains(&fallback) {
            self.fallbacks.push(fallback);
        }
    }

    /// Store a record, returning the name it was stored under
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        record: R,
        policy: DuplicatePolicy,
    ) -> Result<String, AssetError> {
        let name = name.into();
        let stored = if self.records.contains_key(&name) {
            match policy {
                DuplicatePolicy::Replace => name,
                DuplicatePolicy::Rename => self.free_name(&name, 1),
                DuplicatePolicy::Reject => {
                    return Err(AssetError::DuplicateName {
                        collection: self.name.clone(),
                        name,
                    });
                }
            }
        } else {
            name
        };

        self.records.insert(stored.clone(), record);
        Ok(stored)
    }

    /// Store a record under the next free generated name (`key0`, `key1`, ...)
    pub fn insert_unnamed(&mut self, record: R) -> String {
        let name = self.free_name(DEFAULT_NAME_PREFIX, 0);
        self.records.insert(name.clone(), record);
        name
    }

    /// Rename a record; fails if the new name is taken
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> Result<(), AssetError> {
        let to = to.into();
        if from == to {
            return Ok(());
        }
        if self.records.contains_key(&to) {
            return Err(AssetError::DuplicateName {
                collection: self.name.clone(),
                name: to,
            });
        }
        if let Some(record) = self.records.remove(from) {
            self.records.insert(to, record);
        }
        Ok(())
    }

    /// Remove a record
    pub fn remove(&mut self, name: &str) -> Option<R> {
        self.records.remove(name)
    }

    /// First `{base}{n}` not in the table, counting up from `first`
    fn free_name(&self, base: &str, first: usize) -> String {
        (first..)
            .map(|suffix| format!("{base}{suffix}"))
            .find(|candidate| !self.records.contains_key(candidate))
            .unwrap_or_else(|| base.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_policies() {
        let mut collection = AssetCollection::new("icons");

        assert_eq!(collection.insert("coin", 1, DuplicatePolicy::Reject).unwrap(), "coin");
        assert_eq!(collection.insert("coin", 2, DuplicatePolicy::Replace).unwrap(), "coin");
        assert_eq!(collection.try_get("coin"), Some(&2));

        assert_eq!(collection.insert("coin", 3, DuplicatePolicy::Rename).unwrap(), "coin1");
        assert_eq!(collection.insert("coin", 4, DuplicatePolicy::Rename).unwrap(), "coin2");
        assert_eq!(collection.len(), 3);

        let err = collection.insert("coin", 5, DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, AssetError::DuplicateName { ref name, .. } if name == "coin"));
        assert_eq!(collection.try_get("coin"), Some(&2));
    }

    #[test]
    fn test_unnamed_records_get_generated_names() {
        let mut collection = AssetCollection::new("icons");
        collection.insert("key0", 0, DuplicatePolicy::Reject).unwrap();

        assert_eq!(collection.insert_unnamed(1), "key1");
        assert_eq!(collection.insert_unnamed(2), "key2");
        assert_eq!(collection.names(), vec!["key0", "key1", "key2"]);
    }

    #[test]
    fn test_rename() {
        let mut collection = AssetCollection::new("icons");
        collection.insert("a", 1, DuplicatePolicy::Reject).unwrap();
        collection.insert("b", 2, DuplicatePolicy::Reject).unwrap();

        assert!(collection.rename("a", "b").is_err());
        collection.rename("a", "c").unwrap();
        assert_eq!(collection.try_get("c"), Some(&1));
        assert!(!collection.contains("a"));
    }
}
