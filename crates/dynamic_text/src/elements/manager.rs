//! Per-kind element pools
//!
//! [`ElementPools`] is the service labels draw their inline elements from.
//! Each kind's pool is built on first use and kept for the life of the
//! service; prefabs get one pool per prefab.

use std::collections::HashMap;

use super::canvas::UiCanvas;
use super::nodes::{
    HyperlinkElement, PooledElement, PrefabElement, SpriteElement, UnderlineElement,
};
use super::pool::{ElementPool, PoolStats};
use crate::assets::PrefabId;
use crate::config::ElementConfig;
use crate::foundation::collections::NodeKey;

/// An element handed out to a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveElement {
    /// Inline sprite
    Sprite(SpriteElement),
    /// Inline prefab instance
    Prefab(PrefabElement),
    /// Underline bar
    Underline(UnderlineElement),
    /// Hyperlink click area
    Hyperlink(HyperlinkElement),
}

impl ActiveElement {
    /// Canvas node backing the element
    pub fn node(&self) -> NodeKey {
        match self {
            Self::Sprite(element) => element.node(),
            Self::Prefab(element) => element.node(),
            Self::Underline(element) => element.node(),
            Self::Hyperlink(element) => element.node(),
        }
    }
}

/// Pool with the standard hooks: shown on acquire, hidden and parked under
/// the canvas holder node on release
fn standard_pool<T>(name: &str, create: impl FnMut(&mut UiCanvas) -> T + 'static) -> ElementPool<T>
where
    T: PooledElement + PartialEq + 'static,
{
    log::debug!("Creating element pool '{name}'");
    ElementPool::new(name, create)
        .with_on_acquire(|element: &T, canvas| element.set_active(canvas, true))
        .with_on_release(|element: &T, canvas| {
            element.set_active(canvas, false)?;
            let root = canvas.pool_root();
            element.set_parent(canvas, root)?;
            element.release(canvas)
        })
}

/// Lazily created pools for every element kind
#[derive(Debug, Default)]
pub struct ElementPools {
    underline_thickness: f32,
    sprites: Option<ElementPool<SpriteElement>>,
    underlines: Option<ElementPool<UnderlineElement>>,
    hyperlinks: Option<ElementPool<HyperlinkElement>>,
    prefabs: HashMap<PrefabId, ElementPool<PrefabElement>>,
}

impl ElementPools {
    /// Create the service; no pool exists until first used
    pub fn new(config: &ElementConfig) -> Self {
        Self {
            underline_thickness: config.underline_thickness,
            ..Self::default()
        }
    }

    /// Thickness given to underline bars
    pub fn underline_thickness(&self) -> f32 {
        self.underline_thickness
    }

    /// Sprite pool
    pub fn sprites(&mut self) -> &mut ElementPool<SpriteElement> {
        self.sprites
            .get_or_insert_with(|| standard_pool("sprite", SpriteElement::create))
    }

    /// Underline pool
    pub fn underlines(&mut self) -> &mut ElementPool<UnderlineElement> {
        self.underlines
            .get_or_insert_with(|| standard_pool("underline", UnderlineElement::create))
    }

    /// Hyperlink pool
    pub fn hyperlinks(&mut self) -> &mut ElementPool<HyperlinkElement> {
        self.hyperlinks
            .get_or_insert_with(|| standard_pool("hyperlink", HyperlinkElement::create))
    }

    /// Pool of instances of one prefab
    pub fn prefabs(&mut self, prefab: &PrefabId) -> &mut ElementPool<PrefabElement> {
        self.prefabs.entry(prefab.clone()).or_insert_with(|| {
            let id = prefab.clone();
            standard_pool(&format!("prefab:{prefab}"), move |canvas: &mut UiCanvas| {
                PrefabElement::create(canvas, id.clone())
            })
        })
    }

    /// Return an element to the pool it came from
    pub fn release(&mut self, element: ActiveElement, canvas: &mut UiCanvas) {
        match element {
            ActiveElement::Sprite(sprite) => self.sprites().release(sprite, canvas),
            ActiveElement::Underline(bar) => self.underlines().release(bar, canvas),
            ActiveElement::Hyperlink(area) => self.hyperlinks().release(area, canvas),
            ActiveElement::Prefab(instance) => {
                let prefab = instance.prefab().clone();
                self.prefabs(&prefab).release(instance, canvas);
            }
        }
    }

    /// Release a batch of elements
    pub fn release_all(
        &mut self,
        elements: impl IntoIterator<Item = ActiveElement>,
        canvas: &mut UiCanvas,
    ) {
        for element in elements {
            self.release(element, canvas);
        }
    }

    /// Drop every pooled element; used at teardown
    pub fn clear(&mut self) {
        if let Some(pool) = self.sprites.as_mut() {
            pool.clear();
        }
        if let Some(pool) = self.underlines.as_mut() {
            pool.clear();
        }
        if let Some(pool) = self.hyperlinks.as_mut() {
            pool.clear();
        }
        for pool in self.prefabs.values_mut() {
            pool.clear();
        }
    }

    /// Free elements across every pool
    pub fn free_count(&self) -> usize {
        self.sprites.as_ref().map_or(0, ElementPool::free_count)
            + self.underlines.as_ref().map_or(0, ElementPool::free_count)
            + self.hyperlinks.as_ref().map_or(0, ElementPool::free_count)
            + self.prefabs.values().map(ElementPool::free_count).sum::<usize>()
    }

    /// Traffic counters summed across every pool
    pub fn stats(&self) -> PoolStats {
        let fixed = [
            self.sprites.as_ref().map(ElementPool::stats),
            self.underlines.as_ref().map(ElementPool::stats),
            self.hyperlinks.as_ref().map(ElementPool::stats),
        ];

        fixed
            .into_iter()
            .flatten()
            .chain(self.prefabs.values().map(ElementPool::stats))
            .fold(PoolStats::default(), PoolStats::merged)
    }
}
