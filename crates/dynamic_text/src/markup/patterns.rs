//! Combined markup pattern
//!
//! All recognized tag forms are alternatives of one regular expression so a
//! single left-to-right scan finds the next tag of any kind. Every
//! alternative has its own named groups; [`TagMatch::from_captures`] turns
//! whichever alternative matched into a closed enum for dispatch.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::tags::TagKind;

const COLOR_TAG: &str = r"<color=(?P<color_value>[#\w]+)>(?P<color_body>[\s\S]+?)</color>";
const SIZE_TAG: &str = r"<size=(?P<size_value>\w+)>(?P<size_body>[\s\S]+?)</size>";
const BOLD_TAG: &str = r"<b>(?P<bold_body>[\s\S]+?)</b>";
const ITALIC_TAG: &str = r"<i>(?P<italic_body>[\s\S]+?)</i>";
const UNDERLINE_TAG: &str = r"<u>(?P<underline_body>[\s\S]+?)</u>";
const LINK_TAG: &str = r#"<link="(?P<link_id>[^"\n<>]+?)">(?P<link_body>[\s\S]+?)</link>"#;
const SPRITE_TAG: &str = r#"<sprite="(?P<sprite_name>[^"\n<>]+?)"(?: size="?(?P<sprite_size>[^"\s/<>]*)"?)?(?: width="?(?P<sprite_width>[^"\s/<>]*)"?)?/?>"#;
const PREFAB_TAG: &str = r#"<prefab="(?P<prefab_name>[^"\n<>]+?)"(?: size="?(?P<prefab_size>[^"\s/<>]*)"?)?(?: width="?(?P<prefab_width>[^"\s/<>]*)"?)?/?>"#;

/// Build the alternation of every tag form
fn combined_pattern() -> String {
    [
        COLOR_TAG,
        SIZE_TAG,
        BOLD_TAG,
        ITALIC_TAG,
        UNDERLINE_TAG,
        LINK_TAG,
        SPRITE_TAG,
        PREFAB_TAG,
    ]
    .iter()
    .map(|tag| format!("(?:{tag})"))
    .collect::<Vec<_>>()
    .join("|")
}

/// The compiled combined pattern, built on first use
///
/// Returns `None` only if the pattern failed to compile, in which case the
/// parser treats all input as literal text.
pub fn tag_pattern() -> Option<&'static Regex> {
    static TAG_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    TAG_PATTERN
        .get_or_init(|| match Regex::new(&combined_pattern()) {
            Ok(regex) => Some(regex),
            Err(err) => {
                log::error!("Failed to compile markup pattern: {err}");
                None
            }
        })
        .as_ref()
}

/// A recognized tag, borrowed from the scanned text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TagMatch<'t> {
    /// `<color=VALUE>body</color>`
    Color {
        /// Color name or hex string
        value: &'t str,
        /// Inner markup
        body: &'t str,
    },
    /// `<size=N>body</size>`
    Size {
        /// Size value, passed through to the renderer
        value: &'t str,
        /// Inner markup
        body: &'t str,
    },
    /// `<b>body</b>`
    Bold {
        /// Inner markup
        body: &'t str,
    },
    /// `<i>body</i>`
    Italic {
        /// Inner markup
        body: &'t str,
    },
    /// `<u>body</u>`
    Underline {
        /// Inner markup
        body: &'t str,
    },
    /// `<link="ID">body</link>`
    Link {
        /// Opaque link id
        id: &'t str,
        /// Inner markup
        body: &'t str,
    },
    /// `<sprite="NAME" size="S" width="W"/>` or the prefab equivalent
    Quad {
        /// Sprite or prefab
        kind: TagKind,
        /// Inline object name
        name: &'t str,
        /// Raw size multiplier, if present
        size: Option<&'t str>,
        /// Raw width multiplier, if present
        width: Option<&'t str>,
    },
}

impl<'t> TagMatch<'t> {
    /// Classify a match of [`tag_pattern`]
    pub fn from_captures(caps: &Captures<'t>) -> Option<Self> {
        let group = |name: &str| caps.name(name).map(|m| m.as_str());

        if let (Some(value), Some(body)) = (group("color_value"), group("color_body")) {
            return Some(Self::Color { value, body });
        }
        if let (Some(value), Some(body)) = (group("size_value"), group("size_body")) {
            return Some(Self::Size { value, body });
        }
        if let Some(body) = group("bold_body") {
            return Some(Self::Bold { body });
        }
        if let Some(body) = group("italic_body") {
            return Some(Self::Italic { body });
        }
        if let Some(body) = group("underline_body") {
            return Some(Self::Underline { body });
        }
        if let (Some(id), Some(body)) = (group("link_id"), group("link_body")) {
            return Some(Self::Link { id, body });
        }
        if let Some(name) = group("sprite_name") {
            return Some(Self::Quad {
                kind: TagKind::Sprite,
                name,
                size: group("sprite_size"),
                width: group("sprite_width"),
            });
        }
        if let Some(name) = group("prefab_name") {
            return Some(Self::Quad {
                kind: TagKind::Prefab,
                name,
                size: group("prefab_size"),
                width: group("prefab_width"),
            });
        }
        None
    }
}
