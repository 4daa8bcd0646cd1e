//! Retained UI node tree
//!
//! Nodes live in a slot map, so a destroyed node's handle stays detectably
//! invalid for as long as anyone holds it. Positions are in canvas space;
//! `pivot` is the point of the node's rectangle that sits at `position`.

use std::rc::Rc;

use bitflags::bitflags;

use super::ElementError;
use crate::assets::{PrefabId, SpriteId};
use crate::foundation::collections::{HandleMap, NodeKey};
use crate::foundation::math::{Rect, Vec2, Vec3, Vec4};
use crate::markup::color::WHITE;

/// Name of the holder node when none is configured
pub const DEFAULT_POOL_ROOT_NAME: &str = "ElementPoolRoot";

bitflags! {
    /// State flags of a canvas node
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is shown
        const ACTIVE = 1 << 0;
        /// Node receives clicks
        const RAYCAST_TARGET = 1 << 1;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::ACTIVE | Self::RAYCAST_TARGET
    }
}

/// Click listener attached to a node
pub type ClickListener = Rc<dyn Fn()>;

/// One node of the canvas
pub struct UiNode {
    /// Display name
    pub name: String,
    /// Parent node, `None` for roots
    pub parent: Option<NodeKey>,
    /// State flags
    pub flags: NodeFlags,
    /// Canvas-space position of the pivot
    pub position: Vec3,
    /// Width and height
    pub size: Vec2,
    /// Normalized pivot within the node's rectangle
    pub pivot: Vec2,
    /// Lower anchor relative to the parent
    pub anchor_min: Vec2,
    /// Upper anchor relative to the parent
    pub anchor_max: Vec2,
    /// Local scale
    pub scale: Vec3,
    /// Tint color (RGBA)
    pub color: Vec4,
    /// Displayed sprite
    pub sprite: Option<SpriteId>,
    /// Instantiated prefab
    pub prefab: Option<PrefabId>,
    listeners: Vec<ClickListener>,
}

impl UiNode {
    fn new(name: impl Into<String>, parent: Option<NodeKey>) -> Self {
        Self {
            name: name.into(),
            parent,
            flags: NodeFlags::default(),
            position: Vec3::zeros(),
            size: Vec2::zeros(),
            pivot: Vec2::new(0.5, 0.5),
            anchor_min: Vec2::new(0.5, 0.5),
            anchor_max: Vec2::new(0.5, 0.5),
            scale: Vec3::new(1.0, 1.0, 1.0),
            color: WHITE,
            sprite: None,
            prefab: None,
            listeners: Vec::new(),
        }
    }

    /// Whether the node is shown
    pub fn is_active(&self) -> bool {
        self.flags.contains(NodeFlags::ACTIVE)
    }

    /// Whether the node receives clicks
    pub fn is_raycast_target(&self) -> bool {
        self.flags.contains(NodeFlags::RAYCAST_TARGET)
    }

    /// Canvas-space rectangle covered by the node
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.position.x - self.pivot.x * self.size.x,
            self.position.y - self.pivot.y * self.size.y,
            self.size.x,
            self.size.y,
        )
    }

    /// Attach a click listener
    pub fn add_listener(&mut self, listener: ClickListener) {
        self.listeners.push(listener);
    }

    /// Remove every click listener
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Number of attached click listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for UiNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiNode")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("flags", &self.flags)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("sprite", &self.sprite)
            .field("prefab", &self.prefab)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

/// Node tree hosting labels and their inline elements
#[derive(Debug)]
pub struct UiCanvas {
    nodes: HandleMap<NodeKey, UiNode>,
    pool_root: Option<NodeKey>,
    pool_root_name: String,
}

impl Default for UiCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl UiCanvas {
    /// Create an empty canvas
    pub fn new() -> Self {
        Self {
            nodes: HandleMap::with_key(),
            pool_root: None,
            pool_root_name: DEFAULT_POOL_ROOT_NAME.to_string(),
        }
    }

    /// Set the name used for the pooled-element holder node
    pub fn with_pool_root_name(mut self, name: impl Into<String>) -> Self {
        self.pool_root_name = name.into();
        self
    }

    /// Add a node
    pub fn create_node(&mut self, name: impl Into<String>, parent: Option<NodeKey>) -> NodeKey {
        let parent = parent.filter(|key| self.nodes.contains_key(*key));
        self.nodes.insert(UiNode::new(name, parent))
    }

    /// Remove a node and all of its descendants
    ///
    /// Returns `false` if the node was already gone.
    pub fn destroy(&mut self, key: NodeKey) -> bool {
        if !self.nodes.contains_key(key) {
            return false;
        }

        let mut doomed = vec![key];
        let mut index = 0;
        while index < doomed.len() {
            let current = doomed[index];
            doomed.extend(self.children(current));
            index += 1;
        }

        for node in &doomed {
            self.nodes.remove(*node);
        }
        if self.pool_root.is_some_and(|root| !self.nodes.contains_key(root)) {
            self.pool_root = None;
        }

        log::trace!("Destroyed {} canvas node(s)", doomed.len());
        true
    }

    /// Whether `key` refers to a live node
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the canvas has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node
    pub fn node(&self, key: NodeKey) -> Result<&UiNode, ElementError> {
        self.nodes.get(key).ok_or(ElementError::Destroyed { node: key })
    }

    /// Mutably borrow a node
    pub fn node_mut(&mut self, key: NodeKey) -> Result<&mut UiNode, ElementError> {
        self.nodes.get_mut(key).ok_or(ElementError::Destroyed { node: key })
    }

    /// Direct children of a node
    pub fn children(&self, key: NodeKey) -> Vec<NodeKey> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.parent == Some(key))
            .map(|(child, _)| child)
            .collect()
    }

    /// Move a node under a new parent
    pub fn set_parent(&mut self, key: NodeKey, parent: Option<NodeKey>) -> Result<(), ElementError> {
        if let Some(parent) = parent {
            self.node(parent)?;
        }
        self.node_mut(key)?.parent = parent;
        Ok(())
    }

    /// Neutral holder node for released elements, created on first use
    pub fn pool_root(&mut self) -> NodeKey {
        match self.pool_root {
            Some(root) if self.nodes.contains_key(root) => root,
            _ => {
                let root = self.create_node(self.pool_root_name.clone(), None);
                log::debug!("Created pool holder node '{}'", self.pool_root_name);
                self.pool_root = Some(root);
                root
            }
        }
    }

    /// Invoke the click listeners of an active, clickable node
    ///
    /// Returns how many listeners ran.
    pub fn click(&self, key: NodeKey) -> Result<usize, ElementError> {
        let node = self.node(key)?;
        if !node.is_active() || !node.is_raycast_target() {
            return Ok(0);
        }

        let listeners = node.listeners.clone();
        for listener in &listeners {
            listener();
        }
        Ok(listeners.len())
    }

    /// First active, clickable node whose rectangle contains `point`
    pub fn hit_test(&self, point: Vec2) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|(_, node)| {
                node.is_active() && node.is_raycast_target() && node.rect().contains(point)
            })
            .map(|(key, _)| key)
    }
}
