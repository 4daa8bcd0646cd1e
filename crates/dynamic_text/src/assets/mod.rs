//! Inline object assets
//!
//! Sprites and prefabs are addressed by name from markup. Names resolve
//! through [`AssetCollection`]s held in an [`AssetLibrary`]: first the
//! label's own collections, then their fallbacks, then the collections
//! registered as global fallbacks.

pub mod collection;
pub mod library;
pub mod manifest;
pub mod records;

pub use collection::{AssetCollection, DuplicatePolicy};
pub use library::AssetLibrary;
pub use manifest::{CollectionManifest, LibraryManifest, RecordManifest};
pub use records::{InlineRecord, PrefabId, PrefabRecord, SpriteId, SpriteRecord};

use thiserror::Error;

use crate::config::ConfigError;

/// Asset errors
#[derive(Debug, Error)]
pub enum AssetError {
    /// A collection handle or name does not refer to a known collection
    #[error("Unknown asset collection: {0}")]
    UnknownCollection(String),

    /// A record name is already taken and the insert policy rejects it
    #[error("Record '{name}' already exists in collection '{collection}'")]
    DuplicateName {
        /// Collection that rejected the insert
        collection: String,
        /// Conflicting record name
        name: String,
    },

    /// Loading or saving a manifest failed
    #[error("Manifest error: {0}")]
    Config(#[from] ConfigError),
}
