//! # Dynamic Text
//!
//! Rich-text labels with inline sprites, prefab instances, underlines and
//! clickable hyperlinks.
//!
//! ## Features
//!
//! - **Markup Parsing**: `<u>`, `<link="id">`, `<sprite="name"/>` and
//!   `<prefab="name"/>` tags, with styling tags passed through to the renderer
//! - **Region Resolution**: per-line render-space rectangles for every tag,
//!   computed from laid-out glyph quads
//! - **Element Pools**: recycled canvas nodes for inline decorations
//! - **Asset Libraries**: named records searched through local and global
//!   fallback collections, loadable from RON or TOML manifests
//!
//! ## Quick Start
//!
//! ```rust
//! use dynamic_text::prelude::*;
//!
//! let mut services = LabelServices::default();
//! let mut label = DynamicLabel::new(&mut services, "greeting", None);
//! label.set_text(r#"<u>Hello</u> <link="docs">world</link>"#);
//!
//! let resolver = services.resolver;
//! let geometry = label.populate_mesh(&mut MonospaceLayout::new(), &resolver);
//! label.validate(&mut services);
//!
//! assert_eq!(geometry.quad_count(), 10);
//! assert_eq!(label.elements().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod markup;
pub mod layout;
pub mod elements;
pub mod assets;
pub mod label;

/// Common imports for label users
pub mod prelude {
    pub use crate::{
        assets::{AssetCollection, AssetLibrary, DuplicatePolicy, LibraryManifest, PrefabId, PrefabRecord, SpriteId, SpriteRecord},
        config::{Config, DynamicTextConfig},
        elements::{ActiveElement, ElementPools, PooledElement, UiCanvas},
        foundation::{
            collections::{CollectionKey, NodeKey},
            math::{Rect, Vec2, Vec3, Vec4},
        },
        label::{DynamicLabel, HyperlinkEvent, LabelServices, LabelTracker},
        layout::{GlyphGeometry, MonospaceLayout, RegionResolver, TextLayoutEngine},
        markup::{parse, TagDescriptor, TagKind},
    };
}
