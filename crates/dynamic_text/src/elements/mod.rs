//! Inline visual elements
//!
//! Labels decorate their text with four kinds of auxiliary elements: sprite
//! images, prefab instances, underline bars and invisible hyperlink click
//! areas. Elements are expensive to build, so they are recycled through
//! per-kind pools ([`ElementPools`]) shared by every label on a canvas.

pub mod canvas;
pub mod manager;
pub mod nodes;
pub mod pool;

pub use canvas::{ClickListener, NodeFlags, UiCanvas, UiNode};
pub use manager::{ActiveElement, ElementPools};
pub use nodes::{HyperlinkElement, PooledElement, PrefabElement, SpriteElement, UnderlineElement};
pub use pool::{ElementPool, PoolStats};

use thiserror::Error;

use crate::foundation::collections::NodeKey;

/// Element errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    /// The element's canvas node no longer exists
    #[error("Canvas node {node:?} has been destroyed")]
    Destroyed {
        /// Handle of the missing node
        node: NodeKey,
    },
}
