//! Color markup values
//!
//! Tag colors are kept as the raw markup string on the descriptor and only
//! converted when an element is tinted, so a label color change applies to
//! every span that inherits it.

use crate::foundation::math::Vec4;

/// Opaque white
pub const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

/// Fully transparent black
pub const CLEAR: Vec4 = Vec4::new(0.0, 0.0, 0.0, 0.0);

/// Look up a built-in color by name
pub fn named_color(name: &str) -> Option<Vec4> {
    let color = match name {
        "black" => Vec4::new(0.0, 0.0, 0.0, 1.0),
        "blue" => Vec4::new(0.0, 0.0, 1.0, 1.0),
        "clear" => CLEAR,
        "cyan" => Vec4::new(0.0, 1.0, 1.0, 1.0),
        "gray" | "grey" => Vec4::new(0.5, 0.5, 0.5, 1.0),
        "green" => Vec4::new(0.0, 1.0, 0.0, 1.0),
        "magenta" => Vec4::new(1.0, 0.0, 1.0, 1.0),
        "red" => Vec4::new(1.0, 0.0, 0.0, 1.0),
        "white" => WHITE,
        "yellow" => Vec4::new(1.0, 0.92, 0.016, 1.0),
        _ => return None,
    };
    Some(color)
}

/// Convert a color markup value to RGBA
///
/// Accepts a built-in name or `#RRGGBB` (extra digits such as an alpha pair
/// are ignored). Returns `default` for `None`, unknown names and strings that
/// are too short; a malformed digit pair reads as zero.
pub fn parse_color(value: Option<&str>, default: Vec4) -> Vec4 {
    let Some(value) = value else {
        return default;
    };

    if let Some(color) = named_color(value) {
        return color;
    }

    let Some(digits) = value.strip_prefix('#') else {
        return default;
    };
    if digits.len() < 6 {
        return default;
    }

    let channel = |range: std::ops::Range<usize>| {
        let value = digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .unwrap_or(0);
        f32::from(value) / 255.0
    };

    Vec4::new(channel(0..2), channel(2..4), channel(4..6), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hex_color() {
        let color = parse_color(Some("#FF8000"), WHITE);
        assert_relative_eq!(color, Vec4::new(1.0, 128.0 / 255.0, 0.0, 1.0));
    }

    #[test]
    fn test_named_color() {
        assert_eq!(parse_color(Some("red"), WHITE), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(parse_color(Some("grey"), WHITE), parse_color(Some("gray"), WHITE));
        assert_eq!(parse_color(Some("clear"), WHITE), CLEAR);
    }

    #[test]
    fn test_fallbacks_to_default() {
        let default = Vec4::new(0.2, 0.3, 0.4, 1.0);

        assert_eq!(parse_color(None, default), default);
        assert_eq!(parse_color(Some("#FFF"), default), default);
        assert_eq!(parse_color(Some("orange"), default), default);
        assert_eq!(parse_color(Some("FF0000"), default), default);
    }

    #[test]
    fn test_malformed_pair_reads_as_zero() {
        let color = parse_color(Some("#ZZ00FF"), WHITE);
        assert_eq!(color, Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_alpha_digits_ignored() {
        let color = parse_color(Some("#00FF0080"), WHITE);
        assert_eq!(color, Vec4::new(0.0, 1.0, 0.0, 1.0));
    }
}
