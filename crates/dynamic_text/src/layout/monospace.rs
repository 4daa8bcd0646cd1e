//! Fixed-advance layout engine
//!
//! A small [`TextLayoutEngine`] with uniform glyph metrics. It understands
//! the styling markers the parser re-emits and the `<quad .../>` placeholder,
//! wraps at an optional maximum width and truncates at an optional maximum
//! line count.
//!
//! # Layout Coordinate System
//!
//! - Origin (0, 0) is at the baseline of the first line
//! - +X axis points right
//! - +Y axis points up, so line `n` sits at `-n * line_height`
//!
//! # Glyph Emission
//!
//! When everything fits, only visible glyphs get a quad: spaces, newlines and
//! markers emit nothing, so quad `i` is visible glyph `i`. Once lines are cut
//! off the layout falls back to one quad per display character (markers,
//! spaces and the placeholder tail become degenerate quads) and stops at the
//! cut. Tag indices must then be read as character offsets, which is what
//! the region resolver's truncation correction does.

use regex::Regex;
use std::sync::OnceLock;

use super::{GlyphGeometry, TextLayoutEngine, TextVertex};
use crate::foundation::math::{Vec2, Vec3};

const MARKER_PATTERN: &str = r"^(?:</?b>|</?i>|<color=[#\w]+>|</color>|<size=\w+>|</size>|<quad size=(?P<size>\d+), width=(?P<width>[^/>]+)/>)";

fn marker_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| match Regex::new(MARKER_PATTERN) {
            Ok(regex) => Some(regex),
            Err(err) => {
                log::error!("Failed to compile layout marker pattern: {err}");
                None
            }
        })
        .as_ref()
}

/// One unit of display text as the layout sees it
#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Glyph,
    Space,
    Newline,
    /// Styling marker, consumes no space
    Marker { chars: usize },
    /// Inline object placeholder, laid out as a single glyph
    Quad { chars: usize, height: f32, width: f32 },
}

impl Token {
    const fn char_len(self) -> usize {
        match self {
            Self::Glyph | Self::Space | Self::Newline => 1,
            Self::Marker { chars } | Self::Quad { chars, .. } => chars,
        }
    }
}

/// A token with its position
#[derive(Debug, Clone, Copy)]
struct Placed {
    token: Token,
    line: usize,
    x: f32,
    advance: f32,
}

/// Layout engine with a fixed advance per character
#[derive(Debug, Clone)]
pub struct MonospaceLayout {
    /// Advance per character as a fraction of the font size
    advance_ratio: f32,
    /// Line height as a multiple of the font size
    line_spacing: f32,
    /// Wrap width in pixels
    max_width: Option<f32>,
    /// Lines beyond this count are cut off
    max_lines: Option<usize>,
}

impl Default for MonospaceLayout {
    fn default() -> Self {
        Self {
            advance_ratio: 0.5,
            line_spacing: 1.2,
            max_width: None,
            max_lines: None,
        }
    }
}

impl MonospaceLayout {
    /// Create a layout that never wraps or truncates
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-character advance as a fraction of the font size
    pub fn with_advance_ratio(mut self, ratio: f32) -> Self {
        self.advance_ratio = ratio;
        self
    }

    /// Set the line height as a multiple of the font size
    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Wrap lines that would grow wider than `width`
    pub fn with_max_width(mut self, width: f32) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Cut off everything after `lines` lines
    pub fn with_max_lines(mut self, lines: usize) -> Self {
        self.max_lines = Some(lines);
        self
    }

    /// Horizontal advance of one character
    pub fn advance(&self, font_size: u32) -> f32 {
        font_size as f32 * self.advance_ratio
    }

    /// Distance between two baselines
    pub fn line_height(&self, font_size: u32) -> f32 {
        font_size as f32 * self.line_spacing
    }

    /// Number of lines `text` occupies before truncation
    pub fn line_count(&self, text: &str, font_size: u32) -> usize {
        self.place(&tokenize(text), font_size)
            .last()
            .map_or(0, |placed| placed.line + 1)
    }

    fn place(&self, tokens: &[Token], font_size: u32) -> Vec<Placed> {
        let advance = self.advance(font_size);
        let mut placed = Vec::with_capacity(tokens.len());
        let mut line = 0;
        let mut cursor_x = 0.0f32;

        for &token in tokens {
            let width = match token {
                Token::Glyph | Token::Space => advance,
                Token::Quad { height, width, .. } => height * width,
                Token::Marker { .. } | Token::Newline => 0.0,
            };

            let wraps = matches!(token, Token::Glyph | Token::Quad { .. })
                && cursor_x > 0.0
                && self.max_width.is_some_and(|max| cursor_x + width > max);
            if wraps {
                line += 1;
                cursor_x = 0.0;
            }

            placed.push(Placed { token, line, x: cursor_x, advance: width });

            if token == Token::Newline {
                line += 1;
                cursor_x = 0.0;
            } else {
                cursor_x += width;
            }
        }

        placed
    }
}

impl TextLayoutEngine for MonospaceLayout {
    fn source_glyph_count(&mut self, text: &str, _font_size: u32) -> usize {
        text.chars().count()
    }

    fn generate(&mut self, text: &str, font_size: u32) -> GlyphGeometry {
        let placed = self.place(&tokenize(text), font_size);
        let glyph_height = font_size as f32;
        let line_height = self.line_height(font_size);
        let baseline = |line: usize| -(line as f32) * line_height;

        let truncated = self
            .max_lines
            .is_some_and(|max| placed.iter().any(|p| p.line >= max));

        let mut vertices = Vec::new();

        if !truncated {
            for p in &placed {
                match p.token {
                    Token::Glyph => vertices.extend_from_slice(&glyph_quad(
                        p.x,
                        baseline(p.line),
                        p.advance,
                        glyph_height,
                    )),
                    Token::Quad { height, .. } => vertices.extend_from_slice(&glyph_quad(
                        p.x,
                        baseline(p.line),
                        p.advance,
                        height,
                    )),
                    Token::Space | Token::Newline | Token::Marker { .. } => {}
                }
            }

            return GlyphGeometry {
                vertices,
                rendered_glyph_count: text.chars().count(),
            };
        }

        let max_lines = self.max_lines.unwrap_or(usize::MAX);
        let mut rendered = 0;
        for p in placed.iter().filter(|p| p.line < max_lines) {
            let y = baseline(p.line);
            match p.token {
                Token::Glyph => {
                    vertices.extend_from_slice(&glyph_quad(p.x, y, p.advance, glyph_height));
                }
                Token::Quad { chars, height, .. } => {
                    vertices.extend_from_slice(&glyph_quad(p.x, y, p.advance, height));
                    for _ in 1..chars {
                        vertices.extend_from_slice(&empty_quad(p.x + p.advance, y));
                    }
                }
                Token::Space => {
                    vertices.extend_from_slice(&glyph_quad(p.x, y, p.advance, glyph_height));
                }
                Token::Newline | Token::Marker { .. } => {
                    for _ in 0..p.token.char_len() {
                        vertices.extend_from_slice(&empty_quad(p.x, y));
                    }
                }
            }
            rendered += p.token.char_len();
        }

        log::debug!(
            "Layout truncated at {} lines: {rendered} of {} characters rendered",
            max_lines,
            text.chars().count()
        );

        GlyphGeometry {
            vertices,
            rendered_glyph_count: rendered,
        }
    }
}

/// Split display text into layout tokens
fn tokenize(text: &str) -> Vec<Token> {
    let pattern = marker_pattern();
    let mut tokens = Vec::with_capacity(text.len());
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            if let Some((token, len)) = pattern.and_then(|p| match_marker(p, rest)) {
                tokens.push(token);
                rest = &rest[len..];
                continue;
            }
        }

        tokens.push(match ch {
            ' ' => Token::Space,
            '\n' => Token::Newline,
            _ => Token::Glyph,
        });
        rest = &rest[ch.len_utf8()..];
    }

    tokens
}

/// Match a marker at the start of `text`, returning it and its byte length
fn match_marker(pattern: &Regex, text: &str) -> Option<(Token, usize)> {
    let caps = pattern.captures(text)?;
    let whole = caps.get(0)?;
    let chars = whole.as_str().chars().count();

    let token = match (caps.name("size"), caps.name("width")) {
        (Some(size), Some(width)) => Token::Quad {
            chars,
            height: size.as_str().parse().unwrap_or(0.0),
            width: width.as_str().trim().parse().unwrap_or(1.0),
        },
        _ => Token::Marker { chars },
    };

    Some((token, whole.end()))
}

/// Quad for a glyph box with its bottom-left corner at `(x, baseline)`
fn glyph_quad(x: f32, baseline: f32, width: f32, height: f32) -> [TextVertex; 4] {
    let (x_min, x_max) = (x, x + width);
    let (y_min, y_max) = (baseline, baseline + height);

    [
        // Top-left
        TextVertex::new(Vec3::new(x_min, y_max, 0.0), Vec2::new(0.0, 0.0)),
        // Top-right
        TextVertex::new(Vec3::new(x_max, y_max, 0.0), Vec2::new(1.0, 0.0)),
        // Bottom-right
        TextVertex::new(Vec3::new(x_max, y_min, 0.0), Vec2::new(1.0, 1.0)),
        // Bottom-left
        TextVertex::new(Vec3::new(x_min, y_min, 0.0), Vec2::new(0.0, 1.0)),
    ]
}

fn empty_quad(x: f32, baseline: f32) -> [TextVertex; 4] {
    glyph_quad(x, baseline, 0.0, 0.0)
}
