//! Inline markup
//!
//! Parsing of rich-text source into display text and tag descriptors,
//! plus conversion of color markup values.

pub mod color;
pub mod parser;
pub mod patterns;
pub mod tags;

pub use color::parse_color;
pub use parser::{parse, parse_into, ParsedText};
pub use patterns::TagMatch;
pub use tags::{QuadPlaceholder, TagDescriptor, TagKind};
