//! Inline object records

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

macro_rules! asset_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identity from its name
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            /// The identity's name
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self(name)
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self(name.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

asset_id!(
    /// Identity of a sprite image known to the host renderer
    SpriteId
);

asset_id!(
    /// Identity of a prefab the host can instantiate
    PrefabId
);

/// A named inline object entry
///
/// `scale` multiplies the placeholder bounds and `offset` shifts the
/// element's center away from the placeholder's center.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineRecord<O> {
    /// Sprite or prefab to show, if assigned
    pub object: Option<O>,
    /// Offset from the placeholder center
    pub offset: Vec2,
    /// Size multiplier
    pub scale: Vec2,
}

impl<O> Default for InlineRecord<O> {
    fn default() -> Self {
        Self {
            object: None,
            offset: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl<O> InlineRecord<O> {
    /// Record showing `object` at the placeholder with no adjustment
    pub fn new(object: O) -> Self {
        Self {
            object: Some(object),
            ..Self::default()
        }
    }

    /// Set the center offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Set the size multiplier
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }
}

/// Sprite table entry
pub type SpriteRecord = InlineRecord<SpriteId>;

/// Prefab table entry
pub type PrefabRecord = InlineRecord<PrefabId>;
