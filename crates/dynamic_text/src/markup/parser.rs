//! Markup parser
//!
//! Converts annotated source text into the display string handed to the
//! layout engine plus the [`TagDescriptor`]s whose glyph ranges are later
//! resolved into render-space bounds.
//!
//! Styling tags (`color`, `size`, `b`, `i`) are re-emitted verbatim because
//! the renderer interprets them itself. Underline and hyperlink markers are
//! stripped and replaced by descriptors. Sprites and prefabs become a single
//! `<quad .../>` placeholder that the layout engine lays out as one glyph.
//!
//! Parsing never fails: anything the pattern does not recognize, including
//! unterminated tags, is copied through as literal text.

use regex::Regex;

use super::patterns::{tag_pattern, TagMatch};
use super::tags::{QuadPlaceholder, TagDescriptor, TagKind};

/// Result of parsing one source string
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedText {
    /// Text for the layout engine
    pub display_text: String,
    /// Inline annotations, in the order their opening markers appear
    pub tags: Vec<TagDescriptor>,
}

/// Parse `source` at the given font size
///
/// # Example
///
/// ```
/// use dynamic_text::markup::{parse, TagKind};
///
/// let parsed = parse("<u>Hi</u> there", 20);
/// assert_eq!(parsed.display_text, "Hi there");
/// assert_eq!(parsed.tags[0].kind, TagKind::Underline);
/// assert_eq!((parsed.tags[0].start_index, parsed.tags[0].end_index), (0, 2));
/// ```
pub fn parse(source: &str, font_size: u32) -> ParsedText {
    let mut tags = Vec::new();
    let display_text = parse_into(source, font_size, &mut tags);
    ParsedText { display_text, tags }
}

/// Parse `source` into a caller-owned tag list
///
/// `tags` is cleared first so the list can be reused across re-parses.
pub fn parse_into(source: &str, font_size: u32, tags: &mut Vec<TagDescriptor>) -> String {
    tags.clear();

    let Some(pattern) = tag_pattern() else {
        return source.to_owned();
    };
    if source.is_empty() || !pattern.is_match(source) {
        return source.to_owned();
    }

    let mut state = ParseState {
        output: String::with_capacity(source.len()),
        tags,
        visible: 0,
        padding: 0,
        color: None,
        font_size,
        pattern,
    };
    state.parse(source);

    log::debug!(
        "Parsed markup: {} chars -> {} display chars, {} tags, {} visible glyphs",
        source.chars().count(),
        state.output.chars().count(),
        state.tags.len(),
        state.visible
    );

    state.output
}

/// Accumulator owned by a single parse call
struct ParseState<'a> {
    /// Display text being built
    output: String,
    /// Caller's descriptor list
    tags: &'a mut Vec<TagDescriptor>,
    /// Visible glyphs emitted so far
    visible: usize,
    /// Non-glyph characters emitted so far
    padding: usize,
    /// Color inherited from the innermost enclosing color tag
    color: Option<String>,
    /// Font size used to size quad placeholders
    font_size: u32,
    pattern: &'static Regex,
}

impl ParseState<'_> {
    fn parse(&mut self, text: &str) {
        let pattern = self.pattern;
        let mut last_end = 0;

        for caps in pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            self.emit_literal(&text[last_end..whole.start()]);
            last_end = whole.end();

            match TagMatch::from_captures(&caps) {
                Some(tag) => self.apply(tag),
                None => self.emit_literal(whole.as_str()),
            }
        }

        self.emit_literal(&text[last_end..]);
    }

    fn apply(&mut self, tag: TagMatch<'_>) {
        match tag {
            TagMatch::Color { value, body } => {
                self.emit_marker(&format!("<color={value}>"));
                let inherited = self.color.replace(value.to_owned());
                self.parse(body);
                self.color = inherited;
                self.emit_marker("</color>");
            }
            TagMatch::Size { value, body } => {
                self.emit_marker(&format!("<size={value}>"));
                self.parse(body);
                self.emit_marker("</size>");
            }
            TagMatch::Bold { body } => {
                self.emit_marker("<b>");
                self.parse(body);
                self.emit_marker("</b>");
            }
            TagMatch::Italic { body } => {
                self.emit_marker("<i>");
                self.parse(body);
                self.emit_marker("</i>");
            }
            TagMatch::Underline { body } => self.span(TagKind::Underline, None, body),
            TagMatch::Link { id, body } => self.span(TagKind::Hyperlink, Some(id), body),
            TagMatch::Quad { kind, name, size, width } => self.quad(kind, name, size, width),
        }
    }

    /// Copy literal text, counting every character as either a glyph or padding
    fn emit_literal(&mut self, text: &str) {
        self.output.push_str(text);
        for ch in text.chars() {
            if is_empty_char(ch) {
                self.padding += 1;
            } else {
                self.visible += 1;
            }
        }
    }

    /// Re-emit a styling marker; none of its characters are glyphs
    fn emit_marker(&mut self, marker: &str) {
        self.output.push_str(marker);
        self.padding += marker.chars().count();
    }

    /// Underline or hyperlink span around `body`
    fn span(&mut self, kind: TagKind, extra: Option<&str>, body: &str) {
        let mut tag = TagDescriptor::new(kind, self.visible, self.padding);
        tag.extra = extra.map(str::to_owned);
        tag.color = self.color.clone();

        let slot = self.tags.len();
        self.tags.push(tag);

        self.parse(body);

        let tag = &mut self.tags[slot];
        tag.end_index = self.visible;
        tag.end_padding = self.padding;
    }

    /// Sprite or prefab placeholder
    fn quad(&mut self, kind: TagKind, name: &str, size: Option<&str>, width: Option<&str>) {
        let placeholder = QuadPlaceholder {
            pixel_size: (self.font_size as f32 * multiplier(size)) as u32,
            width: multiplier(width),
        };

        let mut tag = TagDescriptor::new(kind, self.visible, self.padding);
        tag.extra = Some(name.to_owned());
        tag.color = self.color.clone();
        tag.placeholder = Some(placeholder);
        self.tags.push(tag);

        // The placeholder is one glyph; the rest of its text is padding.
        let marker = placeholder.marker();
        self.output.push_str(&marker);
        self.visible += 1;
        self.padding += marker.chars().count() - 1;
    }
}

/// Characters that occupy no glyph slot when the text is fully rendered
const fn is_empty_char(ch: char) -> bool {
    matches!(ch, ' ' | '\n')
}

/// Parse an optional size/width attribute, defaulting to 1.0
fn multiplier(value: Option<&str>) -> f32 {
    value
        .and_then(|raw| raw.parse::<f32>().ok())
        .filter(|parsed| parsed.is_finite() && *parsed >= 0.0)
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER_20: &str = "<quad size=20, width=1/>";

    #[test]
    fn test_plain_text_is_unchanged() {
        for text in ["", "hello world", "a < b > c", "line\nbreak", "<notatag>"] {
            let parsed = parse(text, 20);
            assert_eq!(parsed.display_text, text);
            assert!(parsed.tags.is_empty());
        }
    }

    #[test]
    fn test_underline_example() {
        let parsed = parse("<u>Hi</u> there", 20);

        assert_eq!(parsed.display_text, "Hi there");
        assert_eq!(parsed.tags.len(), 1);
        let tag = &parsed.tags[0];
        assert_eq!(tag.kind, TagKind::Underline);
        assert_eq!((tag.start_index, tag.end_index), (0, 2));
        assert_eq!((tag.start_padding, tag.end_padding), (0, 0));
        assert_eq!(tag.extra, None);
        assert_eq!(tag.color, None);
    }

    #[test]
    fn test_sprite_example() {
        let parsed = parse(r#"<sprite="coin" size="2"/>"#, 20);

        assert_eq!(parsed.display_text, "<quad size=40, width=1/>");
        assert_eq!(parsed.tags.len(), 1);
        let tag = &parsed.tags[0];
        assert_eq!(tag.kind, TagKind::Sprite);
        assert_eq!(tag.extra(), Some("coin"));
        assert_eq!(tag.start_index, 0);
        assert_eq!(tag.end_index, 0);
        assert_eq!(
            tag.placeholder,
            Some(QuadPlaceholder { pixel_size: 40, width: 1.0 })
        );
    }

    #[test]
    fn test_hyperlink_carries_id() {
        let parsed = parse(r#"Visit <link="shop">the shop</link>!"#, 20);

        assert_eq!(parsed.display_text, "Visit the shop!");
        let tag = &parsed.tags[0];
        assert_eq!(tag.kind, TagKind::Hyperlink);
        assert_eq!(tag.extra(), Some("shop"));
        // "Visit" = 5 glyphs, one space of padding before the link
        assert_eq!((tag.start_index, tag.start_padding), (5, 1));
        // "the shop" = 7 glyphs and one more space
        assert_eq!((tag.end_index, tag.end_padding), (12, 2));
    }

    #[test]
    fn test_styling_markers_are_reemitted_as_padding() {
        let parsed = parse("<b>x</b><u>y</u>", 20);

        assert_eq!(parsed.display_text, "<b>x</b>y");
        let tag = &parsed.tags[0];
        assert_eq!(tag.start_index, 1);
        assert_eq!(tag.start_padding, "<b>".len() + "</b>".len());
    }

    #[test]
    fn test_color_is_inherited_and_restored() {
        let parsed = parse("<color=red><u>ab</u></color><u>c</u>", 20);

        assert_eq!(parsed.display_text, "<color=red>ab</color>c");
        assert_eq!(parsed.tags.len(), 2);

        let inner = &parsed.tags[0];
        assert_eq!(inner.color.as_deref(), Some("red"));
        assert_eq!((inner.start_index, inner.start_padding), (0, 11));
        assert_eq!((inner.end_index, inner.end_padding), (2, 11));

        let outer = &parsed.tags[1];
        assert_eq!(outer.color, None);
        assert_eq!((outer.start_index, outer.start_padding), (2, 19));
    }

    #[test]
    fn test_nested_color_closes_at_first_close_marker() {
        let parsed = parse("<color=red>a<color=#0000FF><u>b</u></color></color>", 20);

        // The outer color ends at the first </color>, leaving the inner opener literal
        assert_eq!(
            parsed.display_text,
            "<color=red>a<color=#0000FF>b</color></color>"
        );
        assert_eq!(parsed.tags.len(), 1);
        assert_eq!(parsed.tags[0].color.as_deref(), Some("red"));
    }

    #[test]
    fn test_sibling_colors_override_inherited() {
        let parsed = parse("<color=red>a<u>b</u></color><color=#0000FF><u>c</u></color>", 20);

        assert_eq!(parsed.tags[0].color.as_deref(), Some("red"));
        assert_eq!(parsed.tags[1].color.as_deref(), Some("#0000FF"));
    }

    #[test]
    fn test_size_tag_passthrough() {
        let parsed = parse("<size=30><u>big</u></size>", 20);

        assert_eq!(parsed.display_text, "<size=30>big</size>");
        assert_eq!(parsed.tags[0].start_padding, "<size=30>".len());
    }

    #[test]
    fn test_spaces_and_newlines_count_as_padding() {
        let parsed = parse("a b\n<u>c d</u>", 20);

        let tag = &parsed.tags[0];
        assert_eq!((tag.start_index, tag.start_padding), (2, 2));
        assert_eq!((tag.end_index, tag.end_padding), (4, 3));
    }

    #[test]
    fn test_quad_advances_one_glyph() {
        let parsed = parse(r#"<sprite="a"/>x<u>y</u>"#, 20);

        assert_eq!(parsed.display_text, format!("{PLACEHOLDER_20}xy"));
        let underline = &parsed.tags[1];
        assert_eq!(underline.start_index, 2);
        assert_eq!(underline.start_padding, PLACEHOLDER_20.len() - 1);
    }

    #[test]
    fn test_invalid_multipliers_fall_back() {
        let parsed = parse(r#"<sprite="a" size="abc" width=""/>"#, 20);
        assert_eq!(
            parsed.tags[0].placeholder,
            Some(QuadPlaceholder { pixel_size: 20, width: 1.0 })
        );

        let parsed = parse(r#"<prefab="p" size="-3" width=2.5/>"#, 16);
        assert_eq!(parsed.tags[0].kind, TagKind::Prefab);
        assert_eq!(
            parsed.tags[0].placeholder,
            Some(QuadPlaceholder { pixel_size: 16, width: 2.5 })
        );
        assert_eq!(parsed.display_text, "<quad size=16, width=2.5/>");
    }

    #[test]
    fn test_fractional_size_truncates() {
        let parsed = parse(r#"<sprite="a" size="1.5"/>"#, 15);
        assert_eq!(parsed.tags[0].placeholder.map(|p| p.pixel_size), Some(22));
    }

    #[test]
    fn test_quad_inside_color_inherits_color() {
        let parsed = parse(r#"<color=#FFAA00><sprite="gem"/></color>"#, 10);

        assert_eq!(parsed.tags[0].color.as_deref(), Some("#FFAA00"));
        assert_eq!(
            parsed.display_text,
            "<color=#FFAA00><quad size=10, width=1/></color>"
        );
    }

    #[test]
    fn test_placeholder_count_matches_quad_tags() {
        let source = r#"<sprite="a"/> and <prefab="b" size=2/> <u>then <sprite="c"/></u>"#;
        let parsed = parse(source, 12);

        let quads: Vec<_> = parsed.tags.iter().filter(|tag| tag.is_quad()).collect();
        assert_eq!(parsed.display_text.matches("<quad ").count(), quads.len());
        assert_eq!(quads.len(), 3);
        assert!(quads.iter().all(|tag| tag.start_index == tag.end_index));
    }

    #[test]
    fn test_tags_are_in_open_order() {
        let parsed = parse(r#"<u>a<link="x">b</link></u>"#, 20);

        assert_eq!(parsed.tags[0].kind, TagKind::Underline);
        assert_eq!((parsed.tags[0].start_index, parsed.tags[0].end_index), (0, 2));
        assert_eq!(parsed.tags[1].kind, TagKind::Hyperlink);
        assert_eq!((parsed.tags[1].start_index, parsed.tags[1].end_index), (1, 2));
    }

    #[test]
    fn test_unmatched_markup_is_literal() {
        let parsed = parse("<u>open <b>bold</b>", 20);

        assert_eq!(parsed.display_text, "<u>open <b>bold</b>");
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_nested_same_kind_fails_closed() {
        let source = "<u>a<u>b</u>c</u>";
        let parsed = parse(source, 20);

        // The outer tag closes at the first </u>; the inner opener stays literal
        assert_eq!(parsed.display_text, "a<u>bc</u>");
        assert_eq!(parsed.tags.len(), 1);
        assert_eq!((parsed.tags[0].start_index, parsed.tags[0].end_index), (0, 5));
    }

    #[test]
    fn test_parse_into_clears_previous_tags() {
        let mut tags = Vec::new();
        parse_into("<u>a</u><u>b</u>", 20, &mut tags);
        assert_eq!(tags.len(), 2);

        let display = parse_into("plain", 20, &mut tags);
        assert_eq!(display, "plain");
        assert!(tags.is_empty());
    }

    #[test]
    fn test_multibyte_text_counts_chars() {
        let parsed = parse("héllo <u>wörld</u>", 20);

        let tag = &parsed.tags[0];
        assert_eq!((tag.start_index, tag.start_padding), (5, 1));
        assert_eq!(tag.end_index, 10);
    }
}
