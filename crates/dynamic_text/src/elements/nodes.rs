//! Pooled inline elements
//!
//! Each element is a thin handle around one canvas node. All state lives in
//! the canvas, so elements are cheap to copy into and out of pools, and an
//! element whose node was destroyed is detected rather than dereferenced.

use super::canvas::{ClickListener, NodeFlags, UiCanvas};
use super::ElementError;
use crate::assets::{PrefabId, SpriteId};
use crate::foundation::collections::NodeKey;
use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::markup::color::{CLEAR, WHITE};

/// Behaviour shared by every pooled element kind
pub trait PooledElement {
    /// Canvas node backing the element
    fn node(&self) -> NodeKey;

    /// Pivot applied whenever the element is reparented
    fn pivot(&self) -> Vec2 {
        Vec2::new(0.5, 0.5)
    }

    /// Whether the backing node no longer exists
    fn is_destroyed(&self, canvas: &UiCanvas) -> bool {
        !canvas.contains(self.node())
    }

    /// Show or hide the element
    fn set_active(&self, canvas: &mut UiCanvas, active: bool) -> Result<(), ElementError> {
        canvas
            .node_mut(self.node())?
            .flags
            .set(NodeFlags::ACTIVE, active);
        Ok(())
    }

    /// Move under `parent`, resetting scale, pivot and anchors
    fn set_parent(&self, canvas: &mut UiCanvas, parent: NodeKey) -> Result<(), ElementError> {
        canvas.set_parent(self.node(), Some(parent))?;
        let node = canvas.node_mut(self.node())?;
        node.scale = Vec3::new(1.0, 1.0, 1.0);
        node.pivot = self.pivot();
        node.anchor_min = Vec2::zeros();
        node.anchor_max = Vec2::zeros();
        Ok(())
    }

    /// Place the element's pivot at `position`
    fn set_position(&self, canvas: &mut UiCanvas, position: Vec3) -> Result<(), ElementError> {
        canvas.node_mut(self.node())?.position = position;
        Ok(())
    }

    /// Resize the element
    fn set_size(&self, canvas: &mut UiCanvas, size: Vec2) -> Result<(), ElementError> {
        canvas.node_mut(self.node())?.size = size;
        Ok(())
    }

    /// Kind-specific cleanup when the element returns to its pool
    fn release(&self, canvas: &mut UiCanvas) -> Result<(), ElementError> {
        canvas.node(self.node()).map(|_| ())
    }
}

fn set_color(canvas: &mut UiCanvas, node: NodeKey, color: Vec4) -> Result<(), ElementError> {
    canvas.node_mut(node)?.color = color;
    Ok(())
}

/// Inline sprite image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteElement {
    node: NodeKey,
}

impl SpriteElement {
    /// Create a white, non-clickable image node
    pub fn create(canvas: &mut UiCanvas) -> Self {
        let node = canvas.create_node("SpriteNode", None);
        if let Ok(image) = canvas.node_mut(node) {
            image.color = WHITE;
            image.flags.remove(NodeFlags::RAYCAST_TARGET);
        }
        Self { node }
    }

    /// Change the displayed sprite
    pub fn set_sprite(&self, canvas: &mut UiCanvas, sprite: Option<SpriteId>) -> Result<(), ElementError> {
        canvas.node_mut(self.node)?.sprite = sprite;
        Ok(())
    }

    /// Tint the sprite
    pub fn set_color(&self, canvas: &mut UiCanvas, color: Vec4) -> Result<(), ElementError> {
        set_color(canvas, self.node, color)
    }
}

impl PooledElement for SpriteElement {
    fn node(&self) -> NodeKey {
        self.node
    }
}

/// Inline prefab instance
///
/// An instance is bound to the prefab it was created from and is only ever
/// pooled with instances of the same prefab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrefabElement {
    node: NodeKey,
    prefab: PrefabId,
}

impl PrefabElement {
    /// Instantiate `prefab` as a non-clickable node
    pub fn create(canvas: &mut UiCanvas, prefab: PrefabId) -> Self {
        let node = canvas.create_node(format!("PrefabNode({prefab})"), None);
        if let Ok(instance) = canvas.node_mut(node) {
            instance.prefab = Some(prefab.clone());
            instance.flags.remove(NodeFlags::RAYCAST_TARGET);
        }
        Self { node, prefab }
    }

    /// Prefab this element instantiates
    pub fn prefab(&self) -> &PrefabId {
        &self.prefab
    }

    /// Tint the instance
    pub fn set_color(&self, canvas: &mut UiCanvas, color: Vec4) -> Result<(), ElementError> {
        set_color(canvas, self.node, color)
    }
}

impl PooledElement for PrefabElement {
    fn node(&self) -> NodeKey {
        self.node
    }
}

/// Horizontal bar drawn under a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnderlineElement {
    node: NodeKey,
}

impl UnderlineElement {
    /// Create a white, non-clickable bar pivoted at its left middle
    pub fn create(canvas: &mut UiCanvas) -> Self {
        let node = canvas.create_node("UnderlineNode", None);
        if let Ok(bar) = canvas.node_mut(node) {
            bar.color = WHITE;
            bar.pivot = Vec2::new(0.0, 0.5);
            bar.flags.remove(NodeFlags::RAYCAST_TARGET);
        }
        Self { node }
    }

    /// Stretch the bar from `start` to `end`
    pub fn set_location(
        &self,
        canvas: &mut UiCanvas,
        start: Vec3,
        end: Vec3,
        thickness: f32,
    ) -> Result<(), ElementError> {
        let bar = canvas.node_mut(self.node)?;
        bar.position = start;
        bar.size = Vec2::new((end - start).norm(), thickness);
        Ok(())
    }

    /// Color the bar
    pub fn set_color(&self, canvas: &mut UiCanvas, color: Vec4) -> Result<(), ElementError> {
        set_color(canvas, self.node, color)
    }
}

impl PooledElement for UnderlineElement {
    fn node(&self) -> NodeKey {
        self.node
    }

    fn pivot(&self) -> Vec2 {
        Vec2::new(0.0, 0.5)
    }
}

/// Invisible click area over a hyperlink span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HyperlinkElement {
    node: NodeKey,
}

impl HyperlinkElement {
    /// Create a transparent, clickable node
    pub fn create(canvas: &mut UiCanvas) -> Self {
        let node = canvas.create_node("HyperlinkNode", None);
        if let Ok(area) = canvas.node_mut(node) {
            area.color = CLEAR;
            area.flags.insert(NodeFlags::RAYCAST_TARGET);
        }
        Self { node }
    }

    /// Run `callback` when the area is clicked
    pub fn add_callback(&self, canvas: &mut UiCanvas, callback: ClickListener) -> Result<(), ElementError> {
        canvas.node_mut(self.node)?.add_listener(callback);
        Ok(())
    }
}

impl PooledElement for HyperlinkElement {
    fn node(&self) -> NodeKey {
        self.node
    }

    fn release(&self, canvas: &mut UiCanvas) -> Result<(), ElementError> {
        canvas.node_mut(self.node)?.clear_listeners();
        Ok(())
    }
}
