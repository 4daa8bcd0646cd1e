//! Tag descriptors produced by the markup parser

use crate::foundation::math::Rect;

/// Kind of inline annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Inline sprite image
    Sprite,
    /// Inline prefab instance
    Prefab,
    /// Underlined span
    Underline,
    /// Clickable span
    Hyperlink,
}

impl TagKind {
    /// Quad kinds occupy exactly one placeholder glyph
    pub const fn is_quad(self) -> bool {
        matches!(self, Self::Sprite | Self::Prefab)
    }

    /// Markup keyword for this kind
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Sprite => "sprite",
            Self::Prefab => "prefab",
            Self::Underline => "u",
            Self::Hyperlink => "link",
        }
    }
}

/// Size information written into a quad placeholder marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadPlaceholder {
    /// Placeholder height in pixels (font size times the size multiplier)
    pub pixel_size: u32,
    /// Width multiplier relative to the pixel size
    pub width: f32,
}

impl QuadPlaceholder {
    /// The inline marker consumed by the layout engine as a single glyph
    pub fn marker(&self) -> String {
        format!("<quad size={}, width={}/>", self.pixel_size, self.width)
    }
}

/// One inline annotation with its glyph range in the display text
///
/// `start_index`/`end_index` count visible glyphs only. The paddings count
/// the non-glyph characters (spaces, newlines, re-emitted markers and
/// placeholder overhead) that precede the start and end, so that
/// `index + padding` is a character offset into the display text.
#[derive(Debug, Clone, PartialEq)]
pub struct TagDescriptor {
    /// Kind of annotation
    pub kind: TagKind,
    /// First visible glyph
    pub start_index: usize,
    /// Visible glyph counter after the tag content
    pub end_index: usize,
    /// Non-glyph characters before the start
    pub start_padding: usize,
    /// Non-glyph characters before the end
    pub end_padding: usize,
    /// Hyperlink id or inline object name
    pub extra: Option<String>,
    /// Inherited color markup value, `None` means the label color
    pub color: Option<String>,
    /// Placeholder sizing for quad kinds
    pub placeholder: Option<QuadPlaceholder>,
    /// Resolved per-line rectangles, filled by the region resolver
    pub bounds: Vec<Rect>,
}

impl TagDescriptor {
    /// Create a descriptor that starts (and, for now, ends) at the given
    /// counters
    pub fn new(kind: TagKind, index: usize, padding: usize) -> Self {
        Self {
            kind,
            start_index: index,
            end_index: index,
            start_padding: padding,
            end_padding: padding,
            extra: None,
            color: None,
            placeholder: None,
            bounds: Vec::new(),
        }
    }

    /// Whether this descriptor occupies a single placeholder glyph
    pub const fn is_quad(&self) -> bool {
        self.kind.is_quad()
    }

    /// Payload as a string slice
    pub fn extra(&self) -> Option<&str> {
        self.extra.as_deref()
    }

    /// Number of visible glyphs covered by the tag
    pub const fn glyph_len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_kinds() {
        assert!(TagKind::Sprite.is_quad());
        assert!(TagKind::Prefab.is_quad());
        assert!(!TagKind::Underline.is_quad());
        assert!(!TagKind::Hyperlink.is_quad());
    }

    #[test]
    fn test_keywords_match_markup() {
        assert_eq!(TagKind::Sprite.keyword(), "sprite");
        assert_eq!(TagKind::Prefab.keyword(), "prefab");
        assert_eq!(TagKind::Underline.keyword(), "u");
        assert_eq!(TagKind::Hyperlink.keyword(), "link");
    }

    #[test]
    fn test_glyph_len() {
        let mut span = TagDescriptor::new(TagKind::Underline, 3, 1);
        assert_eq!(span.glyph_len(), 0);

        span.end_index = 7;
        assert_eq!(span.glyph_len(), 4);
        assert_eq!(TagDescriptor::new(TagKind::Sprite, 2, 0).glyph_len(), 0);
    }

    #[test]
    fn test_placeholder_marker_format() {
        let placeholder = QuadPlaceholder { pixel_size: 40, width: 1.0 };
        assert_eq!(placeholder.marker(), "<quad size=40, width=1/>");

        let wide = QuadPlaceholder { pixel_size: 24, width: 1.5 };
        assert_eq!(wide.marker(), "<quad size=24, width=1.5/>");
    }
}
