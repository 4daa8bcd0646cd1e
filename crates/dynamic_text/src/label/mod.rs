//! Labels with inline elements
//!
//! A [`DynamicLabel`] owns its source text, parsed tags and the elements
//! currently decorating it. Shared state (canvas, pools, asset libraries)
//! lives in [`LabelServices`], which the host lends to labels each frame,
//! typically through a [`LabelTracker`].

pub mod dynamic_label;
pub mod events;
pub mod services;
pub mod tracker;

pub use dynamic_label::{DynamicLabel, DEFAULT_FONT_SIZE};
pub use events::HyperlinkEvent;
pub use services::LabelServices;
pub use tracker::LabelTracker;
