//! Region resolution
//!
//! Maps each tag's glyph range onto the laid-out glyph quads and produces one
//! rectangle per visual line the range covers.
//!
//! Tag indices count visible glyphs. That matches the quad array as long as
//! the layout rendered everything, even when it wrapped. When the layout
//! rendered fewer characters than the source holds it emits one quad per
//! display character instead, and the paddings recorded by the parser turn
//! the glyph indices back into character offsets.
//!
//! A span's `end_index` is exclusive: its last glyph is `end_index - 1`.

use super::{vertex_index, Corner, TextVertex, VERTICES_PER_GLYPH};
use crate::config::ResolverConfig;
use crate::foundation::math::{Rect, Vec3};
use crate::markup::TagDescriptor;

/// Resolves tag glyph ranges into render-space bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionResolver {
    line_tolerance: f32,
    min_bound_size: f32,
}

impl Default for RegionResolver {
    fn default() -> Self {
        Self::new(&ResolverConfig::default())
    }
}

impl RegionResolver {
    /// Create a resolver with the given tolerances
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            line_tolerance: config.line_tolerance,
            min_bound_size: config.min_bound_size,
        }
    }

    /// Whether two points share a baseline
    pub fn in_line(&self, a: &Vec3, b: &Vec3) -> bool {
        (a.y - b.y).abs() <= self.line_tolerance
    }

    /// Whether a bound is large enough to be worth an element
    pub fn is_valid_bound(&self, bound: &Rect) -> bool {
        bound.diagonal() >= self.min_bound_size
    }

    /// Fill every tag's `bounds` from the glyph quads
    ///
    /// Bounds of previous passes are discarded. Tags that fall entirely
    /// outside the rendered glyphs end up with no bounds.
    pub fn resolve(
        &self,
        tags: &mut [TagDescriptor],
        vertices: &[TextVertex],
        rendered_glyph_count: usize,
        source_glyph_count: usize,
    ) {
        let truncated = rendered_glyph_count < source_glyph_count;
        let glyph_count = vertices.len() / VERTICES_PER_GLYPH;

        for tag in tags.iter_mut() {
            tag.bounds.clear();

            let Some((start, mut last)) = glyph_range(tag, truncated) else {
                continue;
            };
            if vertex_index(last, Corner::BottomLeft) >= vertices.len() {
                let Some(clamped) = glyph_count.checked_sub(1) else {
                    continue;
                };
                last = clamped;
            }
            if last < start {
                continue;
            }

            self.split_lines(start, last, vertices, &mut tag.bounds);
        }

        log::debug!(
            "Resolved {} tags over {glyph_count} glyphs ({}truncated): {} bounds",
            tags.len(),
            if truncated { "" } else { "not " },
            tags.iter().map(|tag| tag.bounds.len()).sum::<usize>()
        );
    }

    /// Turn each quad tag's placeholder glyph into a degenerate quad
    ///
    /// The placeholder would otherwise render as a garbage character. All
    /// four vertices are replaced by the top-left one. Stops at the first
    /// quad tag whose glyph was not rendered.
    pub fn collapse_quad_glyphs(
        &self,
        tags: &[TagDescriptor],
        vertices: &mut [TextVertex],
        rendered_glyph_count: usize,
        source_glyph_count: usize,
    ) {
        let truncated = rendered_glyph_count < source_glyph_count;

        for tag in tags.iter().filter(|tag| tag.is_quad()) {
            let index = corrected(tag.start_index, tag.start_padding, truncated);
            let first = vertex_index(index, Corner::TopLeft);
            let Some(quad) = vertices.get_mut(first..first + VERTICES_PER_GLYPH) else {
                break;
            };

            let top_left = quad[0];
            quad.fill(top_left);
        }
    }

    /// Split the inclusive glyph range `[start, last]` at line breaks
    fn split_lines(
        &self,
        mut start: usize,
        last: usize,
        vertices: &[TextVertex],
        bounds: &mut Vec<Rect>,
    ) {
        let corner = |glyph: usize, corner: Corner| {
            vertices
                .get(vertex_index(glyph, corner))
                .map(|vertex| vertex.position)
        };

        while start <= last {
            let (Some(start_top), Some(start_bottom)) =
                (corner(start, Corner::TopLeft), corner(start, Corner::BottomLeft))
            else {
                break;
            };

            let mut end = last;
            let mut end_bottom = corner(end, Corner::BottomRight);
            while end > start && !end_bottom.is_some_and(|bottom| self.in_line(&start_bottom, &bottom)) {
                end -= 1;
                end_bottom = corner(end, Corner::BottomRight);
            }
            let Some(end_bottom) = end_bottom else {
                break;
            };

            let bound = Rect::new(
                start_bottom.x,
                start_bottom.y,
                end_bottom.x - start_bottom.x,
                start_top.y - start_bottom.y,
            );
            if self.is_valid_bound(&bound) {
                bounds.push(bound);
            }

            start = end + 1;
        }
    }
}

/// First and last glyph of a tag, `None` for spans with no glyphs
fn glyph_range(tag: &TagDescriptor, truncated: bool) -> Option<(usize, usize)> {
    let start = corrected(tag.start_index, tag.start_padding, truncated);
    if tag.is_quad() {
        return Some((start, start));
    }

    let end = corrected(tag.end_index, tag.end_padding, truncated);
    let last = end.checked_sub(1)?;
    (last >= start).then_some((start, last))
}

const fn corrected(index: usize, padding: usize, truncated: bool) -> usize {
    if truncated {
        index + padding
    } else {
        index
    }
}
