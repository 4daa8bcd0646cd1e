//! Rich-text label
//!
//! # Frame Flow
//!
//! 1. [`DynamicLabel::set_text`] parses markup into display text and tags.
//! 2. The host lays out the display text through
//!    [`DynamicLabel::populate_mesh`], which resolves tag bounds and hides
//!    placeholder glyphs. The label is now pending.
//! 3. Once per frame [`DynamicLabel::validate`] (usually via a
//!    [`LabelTracker`](super::LabelTracker)) rebuilds the inline elements of
//!    pending labels, so any number of mesh rebuilds in a frame cost one
//!    element rebuild.

use std::rc::Rc;

use super::events::HyperlinkEvent;
use super::services::LabelServices;
use crate::assets::{PrefabRecord, SpriteRecord};
use crate::elements::{
    ActiveElement, ClickListener, ElementError, HyperlinkElement, NodeFlags, PooledElement,
    PrefabElement, SpriteElement, UiCanvas, UnderlineElement,
};
use crate::foundation::collections::{CollectionKey, NodeKey};
use crate::foundation::math::{Rect, Vec2, Vec3, Vec4};
use crate::layout::{GlyphGeometry, RegionResolver, TextLayoutEngine};
use crate::markup::color::WHITE;
use crate::markup::{parse_color, parse_into, TagDescriptor, TagKind};

/// Font size of new labels
pub const DEFAULT_FONT_SIZE: u32 = 14;

/// A text label with inline sprites, prefabs, underlines and hyperlinks
#[derive(Debug)]
pub struct DynamicLabel {
    node: NodeKey,
    source_text: String,
    display_text: String,
    font_size: u32,
    /// Font size the current tags were parsed at
    parsed_font_size: u32,
    color: Vec4,
    rich_text: bool,
    tags: Vec<TagDescriptor>,
    /// Set once text has been assigned
    resolved: bool,
    /// Elements need rebuilding on the next validation
    pending: bool,
    /// Cached layout character count, `None` when stale
    source_glyph_count: Option<usize>,
    elements: Vec<ActiveElement>,
    sprite_collections: Vec<CollectionKey>,
    prefab_collections: Vec<CollectionKey>,
    hyperlink_event: HyperlinkEvent,
}

impl DynamicLabel {
    /// Create an empty label node on the canvas
    pub fn new(services: &mut LabelServices, name: &str, parent: Option<NodeKey>) -> Self {
        let node = services.canvas.create_node(name, parent);
        if let Ok(label) = services.canvas.node_mut(node) {
            label.flags.remove(NodeFlags::RAYCAST_TARGET);
        }

        Self {
            node,
            source_text: String::new(),
            display_text: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            parsed_font_size: DEFAULT_FONT_SIZE,
            color: WHITE,
            rich_text: services.config.markup.rich_text,
            tags: Vec::new(),
            resolved: false,
            pending: false,
            source_glyph_count: None,
            elements: Vec::new(),
            sprite_collections: Vec::new(),
            prefab_collections: Vec::new(),
            hyperlink_event: HyperlinkEvent::new(),
        }
    }

    /// Canvas node of the label
    pub fn node(&self) -> NodeKey {
        self.node
    }

    /// Source text including markup
    pub fn text(&self) -> &str {
        &self.source_text
    }

    /// Text handed to the layout engine
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Parsed tags with their latest bounds
    pub fn tags(&self) -> &[TagDescriptor] {
        &self.tags
    }

    /// Elements currently shown
    pub fn elements(&self) -> &[ActiveElement] {
        &self.elements
    }

    /// Whether text has been assigned
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Whether elements will be rebuilt on the next validation
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Current font size
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Base text color
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Whether markup is interpreted
    pub fn rich_text(&self) -> bool {
        self.rich_text
    }

    /// Event raised when one of the label's hyperlinks is clicked
    pub fn hyperlink_event(&self) -> &HyperlinkEvent {
        &self.hyperlink_event
    }

    /// Replace the text and re-parse it
    pub fn set_text(&mut self, text: &str) {
        self.source_text = text.to_owned();
        self.reparse();
    }

    /// Change the font size
    ///
    /// Placeholders are sized from the font size, so the next validation
    /// re-parses the text.
    pub fn set_font_size(&mut self, font_size: u32) {
        self.font_size = font_size;
    }

    /// Change the base color inherited by spans without a color tag
    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
        self.pending = true;
    }

    /// Turn markup interpretation on or off
    pub fn set_rich_text(&mut self, rich_text: bool) {
        if self.rich_text != rich_text {
            self.rich_text = rich_text;
            self.reparse();
        }
    }

    /// Search `collection` for sprite names before the global fallbacks
    pub fn add_sprite_collection(&mut self, collection: CollectionKey) {
        if !self.sprite_collections.contains(&collection) {
            self.sprite_collections.push(collection);
        }
    }

    /// Search `collection` for prefab names before the global fallbacks
    pub fn add_prefab_collection(&mut self, collection: CollectionKey) {
        if !self.prefab_collections.contains(&collection) {
            self.prefab_collections.push(collection);
        }
    }

    /// Re-parse the current source text
    pub fn force_update(&mut self) {
        self.reparse();
    }

    fn reparse(&mut self) {
        self.resolved = true;
        self.pending = true;
        self.parsed_font_size = self.font_size;
        self.source_glyph_count = None;

        if self.rich_text {
            self.display_text = parse_into(&self.source_text, self.font_size, &mut self.tags);
        } else {
            self.tags.clear();
            self.display_text.clone_from(&self.source_text);
        }
    }

    /// Lay out the display text and resolve tag bounds
    ///
    /// Returns the glyph geometry with placeholder glyphs collapsed, ready
    /// for the host renderer.
    pub fn populate_mesh(
        &mut self,
        layout: &mut dyn TextLayoutEngine,
        resolver: &RegionResolver,
    ) -> GlyphGeometry {
        let mut geometry = layout.generate(&self.display_text, self.font_size);

        if !self.tags.is_empty() {
            let source_count = match self.source_glyph_count {
                Some(count) => count,
                None => {
                    let count = layout.source_glyph_count(&self.display_text, self.font_size);
                    self.source_glyph_count = Some(count);
                    count
                }
            };
            let rendered = geometry.rendered_glyph_count;

            resolver.resolve(&mut self.tags, &geometry.vertices, rendered, source_count);
            resolver.collapse_quad_glyphs(&self.tags, &mut geometry.vertices, rendered, source_count);
        }

        self.pending = true;
        geometry
    }

    /// Per-frame update: re-parse after a font size change and rebuild
    /// elements if anything is pending
    pub fn validate(&mut self, services: &mut LabelServices) {
        if self.parsed_font_size != self.font_size {
            self.force_update();
        }
        if self.pending {
            self.pending = false;
            self.rebuild_elements(services);
        }
    }

    /// Release current elements and create new ones from the tag bounds
    pub fn rebuild_elements(&mut self, services: &mut LabelServices) {
        self.clear_elements(services);

        let base = match services.canvas.node(self.node) {
            Ok(node) => node.position,
            Err(err) => {
                log::warn!("Cannot rebuild elements: {err}");
                return;
            }
        };

        let mut elements = Vec::new();
        for tag in self.tags.iter().filter(|tag| !tag.bounds.is_empty()) {
            let color = parse_color(tag.color.as_deref(), self.color);
            let name = tag.extra().unwrap_or_default();

            match tag.kind {
                TagKind::Sprite => {
                    let Some(record) = services.sprites.lookup(name, &self.sprite_collections).cloned()
                    else {
                        log::trace!("No {} named '{name}'", tag.kind.keyword());
                        continue;
                    };
                    for bound in &tag.bounds {
                        let sprite = services.pools.sprites().acquire(&mut services.canvas);
                        report(place_sprite(&mut services.canvas, &sprite, self.node, base, bound, &record, color));
                        elements.push(ActiveElement::Sprite(sprite));
                    }
                }
                TagKind::Prefab => {
                    let Some(record) = services.prefabs.lookup(name, &self.prefab_collections).cloned()
                    else {
                        log::trace!("No {} named '{name}'", tag.kind.keyword());
                        continue;
                    };
                    let Some(prefab) = record.object.clone() else {
                        continue;
                    };
                    for bound in &tag.bounds {
                        let instance = services.pools.prefabs(&prefab).acquire(&mut services.canvas);
                        report(place_prefab(&mut services.canvas, &instance, self.node, base, bound, &record, color));
                        elements.push(ActiveElement::Prefab(instance));
                    }
                }
                TagKind::Underline => {
                    let thickness = services.pools.underline_thickness();
                    for bound in &tag.bounds {
                        let bar = services.pools.underlines().acquire(&mut services.canvas);
                        report(place_underline(&mut services.canvas, &bar, self.node, base, bound, thickness, color));
                        elements.push(ActiveElement::Underline(bar));
                    }
                }
                TagKind::Hyperlink => {
                    let event = self.hyperlink_event.clone();
                    let id = name.to_owned();
                    let callback: ClickListener = Rc::new(move || event.invoke(&id));
                    for bound in &tag.bounds {
                        let area = services.pools.hyperlinks().acquire(&mut services.canvas);
                        report(place_hyperlink(&mut services.canvas, &area, self.node, base, bound, &callback));
                        elements.push(ActiveElement::Hyperlink(area));
                    }
                }
            }
        }

        log::debug!(
            "Label rebuilt {} elements for {} tags",
            elements.len(),
            self.tags.len()
        );
        self.elements = elements;
    }

    /// Return every element to its pool
    pub fn clear_elements(&mut self, services: &mut LabelServices) {
        services
            .pools
            .release_all(self.elements.drain(..), &mut services.canvas);
    }

    /// Release all elements and remove the label node
    pub fn destroy(mut self, services: &mut LabelServices) {
        self.clear_elements(services);
        services.canvas.destroy(self.node);
    }
}

fn report(result: Result<(), ElementError>) {
    if let Err(err) = result {
        log::warn!("Failed to place inline element: {err}");
    }
}

fn offset_point(base: Vec3, point: Vec2) -> Vec3 {
    base + Vec3::new(point.x, point.y, 0.0)
}

fn place_sprite(
    canvas: &mut UiCanvas,
    sprite: &SpriteElement,
    parent: NodeKey,
    base: Vec3,
    bound: &Rect,
    record: &SpriteRecord,
    color: Vec4,
) -> Result<(), ElementError> {
    sprite.set_parent(canvas, parent)?;
    sprite.set_size(canvas, bound.size().component_mul(&record.scale))?;
    sprite.set_position(canvas, offset_point(base, bound.center() + record.offset))?;
    sprite.set_sprite(canvas, record.object.clone())?;
    sprite.set_color(canvas, color)
}

fn place_prefab(
    canvas: &mut UiCanvas,
    instance: &PrefabElement,
    parent: NodeKey,
    base: Vec3,
    bound: &Rect,
    record: &PrefabRecord,
    color: Vec4,
) -> Result<(), ElementError> {
    instance.set_parent(canvas, parent)?;
    instance.set_size(canvas, bound.size().component_mul(&record.scale))?;
    instance.set_position(canvas, offset_point(base, bound.center() + record.offset))?;
    instance.set_color(canvas, color)
}

fn place_underline(
    canvas: &mut UiCanvas,
    bar: &UnderlineElement,
    parent: NodeKey,
    base: Vec3,
    bound: &Rect,
    thickness: f32,
    color: Vec4,
) -> Result<(), ElementError> {
    let (min, max) = (bound.min(), bound.max());
    bar.set_parent(canvas, parent)?;
    bar.set_location(
        canvas,
        offset_point(base, min),
        offset_point(base, Vec2::new(max.x, min.y)),
        thickness,
    )?;
    bar.set_color(canvas, color)
}

fn place_hyperlink(
    canvas: &mut UiCanvas,
    area: &HyperlinkElement,
    parent: NodeKey,
    base: Vec3,
    bound: &Rect,
    callback: &ClickListener,
) -> Result<(), ElementError> {
    area.set_parent(canvas, parent)?;
    area.set_size(canvas, bound.size())?;
    area.set_position(canvas, offset_point(base, bound.center()))?;
    area.add_callback(canvas, Rc::clone(callback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetCollection, AssetLibrary, DuplicatePolicy, SpriteId};
    use crate::layout::MonospaceLayout;
    use approx::assert_relative_eq;
    use std::cell::RefCell;

    fn services_with_coin() -> (LabelServices, CollectionKey) {
        let mut icons = AssetCollection::new("icons");
        icons
            .insert(
                "coin",
                SpriteRecord::new(SpriteId::from("ui/coin"))
                    .with_offset(Vec2::new(0.0, 2.0))
                    .with_scale(Vec2::new(0.5, 0.5)),
                DuplicatePolicy::Reject,
            )
            .unwrap();
        let mut sprites = AssetLibrary::new();
        let key = sprites.add_collection(icons);

        (LabelServices::default().with_sprites(sprites), key)
    }

    fn frame(label: &mut DynamicLabel, services: &mut LabelServices) -> GlyphGeometry {
        let resolver = services.resolver;
        let geometry = label.populate_mesh(&mut MonospaceLayout::new(), &resolver);
        label.validate(services);
        geometry
    }

    #[test]
    fn test_set_text_parses_markup() {
        let mut services = LabelServices::default();
        let mut label = DynamicLabel::new(&mut services, "label", None);

        label.set_text("<u>Hi</u> there");
        assert_eq!(label.display_text(), "Hi there");
        assert_eq!(label.tags().len(), 1);
        assert!(label.is_pending());
        assert!(label.is_resolved());
    }

    #[test]
    fn test_rich_text_off_keeps_markup() {
        let mut services = LabelServices::default();
        let mut label = DynamicLabel::new(&mut services, "label", None);
        label.set_rich_text(false);

        label.set_text("<u>Hi</u>");
        assert_eq!(label.display_text(), "<u>Hi</u>");
        assert!(label.tags().is_empty());

        label.set_rich_text(true);
        assert_eq!(label.display_text(), "Hi");
    }

    #[test]
    fn test_underline_element_follows_bound() {
        let mut services = LabelServices::default();
        let mut label = DynamicLabel::new(&mut services, "label", None);
        label.set_font_size(20);
        label.set_text("<color=red><u>Hi</u></color> there");

        frame(&mut label, &mut services);
        assert!(!label.is_pending());

        let [ActiveElement::Underline(bar)] = label.elements() else {
            panic!("expected one underline, got {:?}", label.elements());
        };
        let node = services.canvas.node(bar.node()).unwrap();
        assert_eq!(node.parent, Some(label.node()));
        assert_relative_eq!(node.size.x, 20.0);
        assert_relative_eq!(node.size.y, 4.0);
        assert_eq!(node.color, Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_sprite_uses_record_scale_and_offset() {
        let (mut services, icons) = services_with_coin();
        let mut label = DynamicLabel::new(&mut services, "label", None);
        label.add_sprite_collection(icons);
        label.set_font_size(20);
        label.set_text(r#"<sprite="coin" size=2/>"#);

        let geometry = frame(&mut label, &mut services);

        // The placeholder glyph is collapsed
        let first = geometry.vertices[0];
        assert!(geometry.vertices[..4].iter().all(|v| *v == first));

        let [ActiveElement::Sprite(sprite)] = label.elements() else {
            panic!("expected one sprite, got {:?}", label.elements());
        };
        let node = services.canvas.node(sprite.node()).unwrap();
        assert_eq!(node.sprite, Some(SpriteId::from("ui/coin")));
        assert_relative_eq!(node.size, Vec2::new(20.0, 20.0));
        assert_relative_eq!(node.position, Vec3::new(20.0, 22.0, 0.0));
        assert_eq!(node.color, WHITE);
    }

    #[test]
    fn test_unknown_sprite_creates_nothing() {
        let mut services = LabelServices::default();
        let mut label = DynamicLabel::new(&mut services, "label", None);
        label.set_text(r#"a<sprite="missing"/>"#);

        frame(&mut label, &mut services);
        assert!(label.elements().is_empty());
    }

    #[test]
    fn test_hyperlink_click_reaches_listener() {
        let mut services = LabelServices::default();
        let mut label = DynamicLabel::new(&mut services, "label", None);
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicked);
        label
            .hyperlink_event()
            .add_listener(move |id| sink.borrow_mut().push(id.to_owned()));
        label.set_text(r#"<link="shop">buy</link>"#);

        frame(&mut label, &mut services);

        let [ActiveElement::Hyperlink(area)] = label.elements() else {
            panic!("expected one hyperlink, got {:?}", label.elements());
        };
        services.canvas.click(area.node()).unwrap();
        assert_eq!(*clicked.borrow(), vec!["shop".to_string()]);
    }

    #[test]
    fn test_rebuild_recycles_elements() {
        let mut services = LabelServices::default();
        let mut label = DynamicLabel::new(&mut services, "label", None);
        label.set_text("<u>a</u> <u>b</u>");

        frame(&mut label, &mut services);
        let first: Vec<_> = label.elements().iter().map(ActiveElement::node).collect();
        frame(&mut label, &mut services);
        let second: Vec<_> = label.elements().iter().map(ActiveElement::node).collect();

        assert_eq!(first.len(), 2);
        let mut sorted_first = first.clone();
        let mut sorted_second = second;
        sorted_first.sort();
        sorted_second.sort();
        assert_eq!(sorted_first, sorted_second);
        assert_eq!(services.pools.stats().created, 2);
    }

    #[test]
    fn test_font_size_change_reparses_on_validate() {
        let mut services = LabelServices::default();
        let mut label = DynamicLabel::new(&mut services, "label", None);
        label.set_font_size(10);
        label.set_text(r#"<sprite="coin"/>"#);
        assert_eq!(label.display_text(), "<quad size=10, width=1/>");

        label.set_font_size(30);
        label.validate(&mut services);
        assert_eq!(label.display_text(), "<quad size=30, width=1/>");
    }

    #[test]
    fn test_destroy_returns_elements_and_removes_node() {
        let mut services = LabelServices::default();
        let mut label = DynamicLabel::new(&mut services, "label", None);
        label.set_text("<u>Hi</u>");
        frame(&mut label, &mut services);

        let node = label.node();
        label.destroy(&mut services);

        assert!(!services.canvas.contains(node));
        assert_eq!(services.pools.free_count(), 1);
    }
}
