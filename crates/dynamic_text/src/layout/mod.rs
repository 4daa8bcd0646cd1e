//! Glyph geometry and region resolution
//!
//! The host layout engine turns display text into glyph quads; this module
//! defines that interface ([`TextLayoutEngine`]), the vertex layout it must
//! produce, and the [`RegionResolver`] that maps tag ranges onto the quads.
//!
//! # Vertex Layout
//!
//! Every glyph contributes four consecutive vertices in fixed corner order:
//!
//! ```text
//!   0 TL ──── 1 TR
//!    │          │
//!   3 BL ──── 2 BR
//! ```
//!
//! +Y points up, so a line below another has smaller Y values.

pub mod monospace;
pub mod regions;

pub use monospace::MonospaceLayout;
pub use regions::RegionResolver;

use crate::foundation::math::{Vec2, Vec3};

/// Number of vertices emitted per glyph
pub const VERTICES_PER_GLYPH: usize = 4;

/// Corner of a glyph quad, valued by its offset within the glyph's vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    /// Top-left
    TopLeft = 0,
    /// Top-right
    TopRight = 1,
    /// Bottom-right
    BottomRight = 2,
    /// Bottom-left
    BottomLeft = 3,
}

/// Index of `corner` of glyph `glyph` in a flat vertex array
pub const fn vertex_index(glyph: usize, corner: Corner) -> usize {
    glyph * VERTICES_PER_GLYPH + corner as usize
}

/// Vertex data for text rendering
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct TextVertex {
    /// Position in label space
    pub position: Vec3,
    /// UV texture coordinates
    pub uv: Vec2,
}

impl TextVertex {
    /// Create a vertex
    pub const fn new(position: Vec3, uv: Vec2) -> Self {
        Self { position, uv }
    }
}

/// Output of one layout pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphGeometry {
    /// Four vertices per emitted glyph, in [`Corner`] order
    pub vertices: Vec<TextVertex>,
    /// Number of characters the layout actually processed
    ///
    /// Smaller than [`TextLayoutEngine::source_glyph_count`] when content
    /// was truncated.
    pub rendered_glyph_count: usize,
}

impl GlyphGeometry {
    /// Number of glyph quads in the vertex array
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_GLYPH
    }

    /// Position of one corner of one glyph, if present
    pub fn corner(&self, glyph: usize, corner: Corner) -> Option<Vec3> {
        self.vertices
            .get(vertex_index(glyph, corner))
            .map(|vertex| vertex.position)
    }
}

/// Host layout system that turns display text into glyph quads
pub trait TextLayoutEngine {
    /// Number of characters the layout processes when nothing is truncated
    fn source_glyph_count(&mut self, text: &str, font_size: u32) -> usize;

    /// Lay out `text` and return the glyph quads
    fn generate(&mut self, text: &str, font_size: u32) -> GlyphGeometry;
}
