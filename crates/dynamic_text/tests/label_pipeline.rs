//! End-to-end tests: markup through layout, region resolution and elements

use dynamic_text::config::ElementConfig;
use dynamic_text::prelude::*;

use approx::assert_relative_eq;
use std::cell::RefCell;
use std::rc::Rc;

/// Parse, lay out and resolve `source`, returning the tags with bounds
fn resolve(layout: &mut MonospaceLayout, source: &str, font_size: u32) -> Vec<TagDescriptor> {
    let mut parsed = parse(source, font_size);
    let geometry = layout.generate(&parsed.display_text, font_size);
    let source_count = layout.source_glyph_count(&parsed.display_text, font_size);

    RegionResolver::default().resolve(
        &mut parsed.tags,
        &geometry.vertices,
        geometry.rendered_glyph_count,
        source_count,
    );
    parsed.tags
}

#[test]
fn test_underline_covers_its_word_only() {
    let tags = resolve(&mut MonospaceLayout::new(), "<u>Hi</u> there", 20);

    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].bounds, vec![Rect::new(0.0, 0.0, 20.0, 20.0)]);
}

#[test]
fn test_span_across_two_line_breaks_has_three_bounds() {
    let mut layout = MonospaceLayout::new().with_max_width(45.0);
    let tags = resolve(&mut layout, "<u>aaaa bbbb cccc</u>", 20);

    let bounds = &tags[0].bounds;
    assert_eq!(bounds.len(), 3);
    for (line, bound) in bounds.iter().enumerate() {
        assert_relative_eq!(bound.x, 0.0);
        assert_relative_eq!(bound.y, -(line as f32) * 24.0);
        assert_relative_eq!(bound.width, 40.0);
        assert_relative_eq!(bound.height, 20.0);
    }
}

#[test]
fn test_truncated_span_is_clamped_to_rendered_glyphs() {
    let mut layout = MonospaceLayout::new().with_max_width(45.0).with_max_lines(1);
    let tags = resolve(&mut layout, "<u>aaaa bbbb cccc</u>", 20);

    // Only "aaaa " survives truncation
    let bounds = &tags[0].bounds;
    assert_eq!(bounds.len(), 1);
    assert_relative_eq!(bounds[0].x, 0.0);
    assert_relative_eq!(bounds[0].y, 0.0);
    assert_relative_eq!(bounds[0].width, 50.0);
}

#[test]
fn test_pool_never_creates_more_than_peak_demand() {
    let mut canvas = UiCanvas::new();
    let mut pools = ElementPools::new(&ElementConfig::default());

    for _ in 0..3 {
        let batch: Vec<_> = (0..4)
            .map(|_| ActiveElement::Underline(pools.underlines().acquire(&mut canvas)))
            .collect();
        pools.release_all(batch, &mut canvas);
    }

    let stats = pools.stats();
    assert_eq!(stats.created, 4);
    assert_eq!(stats.acquired, 12);
    assert_eq!(pools.free_count(), 4);
}

#[test]
fn test_fallback_cycle_terminates() {
    let mut library: AssetLibrary<SpriteRecord> = AssetLibrary::new();
    let a = library.add_collection(AssetCollection::new("a"));
    let mut b_collection = AssetCollection::new("b");
    b_collection
        .insert("x", SpriteRecord::new(SpriteId::from("ui/x")), DuplicatePolicy::Reject)
        .unwrap();
    let b = library.add_collection(b_collection);
    library.add_fallback(a, b).unwrap();
    library.add_fallback(b, a).unwrap();

    assert!(library.lookup("x", &[a]).is_some());
    assert!(library.lookup("missing", &[a]).is_none());
}

#[test]
fn test_global_fallback_sprite_is_placed() {
    let manifest = LibraryManifest::load_from_str(
        "library.ron",
        r#"(
            collections: [(name: "common", records: {"heart": (object: Some("ui/heart"))})],
            global_fallbacks: ["common"],
        )"#,
    )
    .unwrap();
    let mut services = LabelServices::default().with_sprites(manifest.build().unwrap());

    let mut label = DynamicLabel::new(&mut services, "label", None);
    label.set_text(r#"<sprite="heart"/>"#);
    let resolver = services.resolver;
    label.populate_mesh(&mut MonospaceLayout::new(), &resolver);
    label.validate(&mut services);

    let [ActiveElement::Sprite(sprite)] = label.elements() else {
        panic!("expected one sprite, got {:?}", label.elements());
    };
    let node = services.canvas.node(sprite.node()).unwrap();
    assert_eq!(node.sprite, Some(SpriteId::from("ui/heart")));
    assert_relative_eq!(node.position, Vec3::new(7.0, 7.0, 0.0));
    assert_relative_eq!(node.size, Vec2::new(14.0, 14.0));
}

#[test]
fn test_hyperlink_click_fires_once_after_rebuilds() {
    let mut services = LabelServices::default();
    let label = Rc::new(RefCell::new(DynamicLabel::new(&mut services, "label", None)));
    let mut tracker = LabelTracker::new();
    tracker.track(&label);

    let clicks = Rc::new(RefCell::new(Vec::new()));
    {
        let mut label = label.borrow_mut();
        label.set_font_size(20);
        label.set_text(r#"<link="go">go</link>"#);
        let sink = Rc::clone(&clicks);
        label
            .hyperlink_event()
            .add_listener(move |id| sink.borrow_mut().push(id.to_owned()));
    }

    let resolver = services.resolver;
    for _ in 0..2 {
        label
            .borrow_mut()
            .populate_mesh(&mut MonospaceLayout::new(), &resolver);
        tracker.update(&mut services);
    }

    let hit = services
        .canvas
        .hit_test(Vec2::new(10.0, 10.0))
        .expect("hyperlink area under the link text");
    assert_eq!(services.canvas.click(hit).unwrap(), 1);
    assert_eq!(*clicks.borrow(), vec!["go".to_string()]);
}

#[test]
fn test_rich_text_disabled_by_config() {
    let config = DynamicTextConfig::load_from_str("label.toml", "[markup]\nrich_text = false\n").unwrap();
    let mut services = LabelServices::new(config);

    let mut label = DynamicLabel::new(&mut services, "label", None);
    label.set_text("<u>plain</u>");

    assert_eq!(label.display_text(), "<u>plain</u>");
    assert!(label.tags().is_empty());
}
