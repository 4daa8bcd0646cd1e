//! Persisted library description
//!
//! A manifest lists collections by name, their records and the names of
//! their fallbacks, so it can be written by hand in RON or TOML and loaded
//! through the shared [`Config`] trait.
//!
//! ```ron
//! (
//!     collections: [
//!         (
//!             name: "icons",
//!             fallbacks: ["shared"],
//!             records: {
//!                 "coin": (object: Some("ui/coin"), offset: (0.0, 2.0), scale: (1.0, 1.0)),
//!             },
//!         ),
//!         (name: "shared"),
//!     ],
//!     global_fallbacks: ["shared"],
//! )
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::collection::{AssetCollection, DuplicatePolicy};
use super::library::AssetLibrary;
use super::records::InlineRecord;
use super::AssetError;
use crate::config::Config;
use crate::foundation::math::Vec2;

/// One persisted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordManifest {
    /// Object identity name
    pub object: Option<String>,
    /// Center offset `(x, y)`
    pub offset: (f32, f32),
    /// Size multiplier `(x, y)`
    pub scale: (f32, f32),
}

impl Default for RecordManifest {
    fn default() -> Self {
        Self {
            object: None,
            offset: (0.0, 0.0),
            scale: (1.0, 1.0),
        }
    }
}

impl<O: From<String>> From<&RecordManifest> for InlineRecord<O> {
    fn from(manifest: &RecordManifest) -> Self {
        Self {
            object: manifest.object.clone().map(O::from),
            offset: Vec2::new(manifest.offset.0, manifest.offset.1),
            scale: Vec2::new(manifest.scale.0, manifest.scale.1),
        }
    }
}

impl<O: AsRef<str>> From<&InlineRecord<O>> for RecordManifest {
    fn from(record: &InlineRecord<O>) -> Self {
        Self {
            object: record.object.as_ref().map(|object| object.as_ref().to_owned()),
            offset: (record.offset.x, record.offset.y),
            scale: (record.scale.x, record.scale.y),
        }
    }
}

/// One persisted collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionManifest {
    /// Collection name, unique within the manifest
    pub name: String,
    /// Names of fallback collections, in search order
    pub fallbacks: Vec<String>,
    /// Records by name
    pub records: BTreeMap<String, RecordManifest>,
}

/// A whole library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryManifest {
    /// Every collection
    pub collections: Vec<CollectionManifest>,
    /// Names of collections searched after every label's own
    pub global_fallbacks: Vec<String>,
}

impl Config for LibraryManifest {}

impl LibraryManifest {
    /// Build a library of inline records
    ///
    /// Fails if a fallback names a collection the manifest does not define.
    pub fn build<O: From<String>>(&self) -> Result<AssetLibrary<InlineRecord<O>>, AssetError> {
        let mut library = AssetLibrary::new();

        let mut keys = Vec::with_capacity(self.collections.len());
        for manifest in &self.collections {
            let mut collection = AssetCollection::new(manifest.name.clone());
            for (name, record) in &manifest.records {
                collection.insert(name.clone(), InlineRecord::from(record), DuplicatePolicy::Reject)?;
            }
            keys.push(library.add_collection(collection));
        }

        let resolve = |library: &AssetLibrary<InlineRecord<O>>, name: &str| {
            library
                .find(name)
                .ok_or_else(|| AssetError::UnknownCollection(name.to_owned()))
        };

        for (manifest, &key) in self.collections.iter().zip(&keys) {
            for fallback in &manifest.fallbacks {
                let fallback = resolve(&library, fallback)?;
                library.add_fallback(key, fallback)?;
            }
        }
        for name in &self.global_fallbacks {
            let global = resolve(&library, name)?;
            library.register_global_fallback(global)?;
        }

        log::info!(
            "Built asset library: {} collections, {} global fallbacks",
            library.len(),
            library.global_fallbacks().len()
        );
        Ok(library)
    }

    /// Describe an existing library
    pub fn from_library<O: AsRef<str>>(library: &AssetLibrary<InlineRecord<O>>) -> Self {
        let name_of = |key| {
            library
                .collection(key)
                .map(|collection| collection.name().to_owned())
        };

        let collections = library
            .iter()
            .map(|(_, collection)| CollectionManifest {
                name: collection.name().to_owned(),
                fallbacks: collection.fallbacks().iter().filter_map(|&key| name_of(key)).collect(),
                records: collection
                    .iter()
                    .map(|(name, record)| (name.to_owned(), RecordManifest::from(record)))
                    .collect(),
            })
            .collect();

        Self {
            collections,
            global_fallbacks: library
                .global_fallbacks()
                .iter()
                .filter_map(|&key| name_of(key))
                .collect(),
        }
    }

    /// Load a manifest file and build its library
    pub fn load_library<O: From<String>>(path: &str) -> Result<AssetLibrary<InlineRecord<O>>, AssetError> {
        Self::load_from_file(path)?.build()
    }
}
