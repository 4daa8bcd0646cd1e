//! Shared label services

use crate::assets::{AssetLibrary, PrefabRecord, SpriteRecord};
use crate::config::DynamicTextConfig;
use crate::elements::{ElementPools, UiCanvas};
use crate::layout::RegionResolver;

/// Everything labels share: the canvas, element pools and asset libraries
///
/// Owned by the host and lent to labels on every validation tick.
#[derive(Debug)]
pub struct LabelServices {
    /// Node tree labels and their elements live in
    pub canvas: UiCanvas,
    /// Pools of inline elements
    pub pools: ElementPools,
    /// Sprite records
    pub sprites: AssetLibrary<SpriteRecord>,
    /// Prefab records
    pub prefabs: AssetLibrary<PrefabRecord>,
    /// Region resolver built from the configuration
    pub resolver: RegionResolver,
    /// Active configuration
    pub config: DynamicTextConfig,
}

impl Default for LabelServices {
    fn default() -> Self {
        Self::new(DynamicTextConfig::default())
    }
}

impl LabelServices {
    /// Create services with empty asset libraries
    pub fn new(config: DynamicTextConfig) -> Self {
        Self {
            canvas: UiCanvas::new().with_pool_root_name(config.elements.pool_root_name.clone()),
            pools: ElementPools::new(&config.elements),
            sprites: AssetLibrary::new(),
            prefabs: AssetLibrary::new(),
            resolver: RegionResolver::new(&config.resolver),
            config,
        }
    }

    /// Use `library` for sprite lookups
    pub fn with_sprites(mut self, library: AssetLibrary<SpriteRecord>) -> Self {
        self.sprites = library;
        self
    }

    /// Use `library` for prefab lookups
    pub fn with_prefabs(mut self, library: AssetLibrary<PrefabRecord>) -> Self {
        self.prefabs = library;
        self
    }

    /// Drop every pooled element; labels must have released theirs first
    pub fn shutdown(&mut self) {
        log::info!("Shutting down label services ({} pooled elements)", self.pools.free_count());
        self.pools.clear();
    }
}
