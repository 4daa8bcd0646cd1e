//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a node on the [`UiCanvas`](crate::elements::UiCanvas)
    ///
    /// Handles are generational: once a node is destroyed its handle never
    /// resolves again, which is how pools detect dead elements.
    pub struct NodeKey;

    /// Stable handle to an [`AssetCollection`](crate::assets::AssetCollection)
    /// inside an [`AssetLibrary`](crate::assets::AssetLibrary)
    pub struct CollectionKey;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<K, T> = SlotMap<K, T>;
