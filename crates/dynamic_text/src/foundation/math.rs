//! Math utilities and types
//!
//! Provides the vector aliases used for render-space positions and colors,
//! and the axis-aligned [`Rect`] produced by glyph region resolution.

pub use nalgebra::{Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (RGBA colors)
pub type Vec4 = Vector4<f32>;

/// Axis-aligned rectangle in render space
///
/// `(x, y)` is the bottom-left corner; +Y points up, matching the glyph
/// vertices emitted by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Width (may be negative for right-to-left glyph runs)
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its bottom-left corner and extent
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Bottom-left corner
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Top-right corner
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Width and height as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Length of the diagonal
    pub fn diagonal(&self) -> f32 {
        self.size().norm()
    }

    /// Whether `point` lies inside the rectangle (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        let (left, right) = (min.x.min(max.x), min.x.max(max.x));
        let (bottom, top) = (min.y.min(max.y), min.y.max(max.y));
        point.x >= left && point.x <= right && point.y >= bottom && point.y <= top
    }
}
