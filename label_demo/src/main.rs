//! Label demo application
//!
//! Lays out a rich-text label with the monospace layout engine, builds its
//! inline elements and simulates a click on the hyperlink.
//!
//! ```text
//! label_demo [config.toml|config.ron] [library.ron|library.toml]
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use dynamic_text::foundation::logging;
use dynamic_text::prelude::*;

const DEMO_LIBRARY: &str = r#"(
    collections: [
        (
            name: "icons",
            fallbacks: ["common"],
            records: {
                "coin": (object: Some("ui/coin"), offset: (0.0, 2.0), scale: (0.8, 0.8)),
            },
        ),
        (
            name: "common",
            records: {
                "heart": (object: Some("ui/heart")),
            },
        ),
    ],
    global_fallbacks: ["common"],
)"#;

const DEMO_TEXT: &str = r#"Collect <color=yellow><sprite="coin" size=1.2/> coins</color> and <u>keep</u> your <sprite="heart"/>
Read the <link="rules"><u>full rules</u></link> before playing"#;

fn load_config(path: Option<&str>) -> Result<DynamicTextConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => DynamicTextConfig::load_from_file(path)?,
        None => DynamicTextConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn load_sprites(path: Option<&str>) -> Result<AssetLibrary<SpriteRecord>, Box<dyn std::error::Error>> {
    let library = match path {
        Some(path) => LibraryManifest::load_library(path)?,
        None => LibraryManifest::load_from_str("demo.ron", DEMO_LIBRARY)?.build()?,
    };
    Ok(library)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = load_config(args.first().map(String::as_str))?;
    logging::init_with_level(&config.logging.level);
    log::info!("Starting label demo");

    let sprites = load_sprites(args.get(1).map(String::as_str))?;
    let icons = sprites.find("icons");
    let mut services = LabelServices::new(config).with_sprites(sprites);

    let root = services.canvas.create_node("Canvas", None);
    let label = Rc::new(RefCell::new(DynamicLabel::new(&mut services, "DemoLabel", Some(root))));
    let mut tracker = LabelTracker::new();
    tracker.track(&label);

    {
        let mut label = label.borrow_mut();
        if let Some(icons) = icons {
            label.add_sprite_collection(icons);
        }
        label.set_font_size(16);
        label.set_text(DEMO_TEXT);
        label
            .hyperlink_event()
            .add_listener(|id| log::info!("Hyperlink clicked: {id}"));
    }

    // One frame: layout, then validation
    let mut layout = MonospaceLayout::new().with_max_width(320.0);
    let resolver = services.resolver;
    let geometry = label.borrow_mut().populate_mesh(&mut layout, &resolver);
    tracker.update(&mut services);

    let label_ref = label.borrow();
    println!("Display text:\n{}\n", label_ref.display_text());
    println!(
        "{} glyph quads, {} rendered characters",
        geometry.quad_count(),
        geometry.rendered_glyph_count
    );

    for tag in label_ref.tags() {
        println!(
            "{:?} '{}' glyphs {}..{}: {:?}",
            tag.kind,
            tag.extra().unwrap_or_default(),
            tag.start_index,
            tag.end_index,
            tag.bounds
        );
    }

    for element in label_ref.elements() {
        let node = services.canvas.node(element.node())?;
        println!(
            "{:?} at ({:.1}, {:.1}) size {:.1} x {:.1}",
            element, node.position.x, node.position.y, node.size.x, node.size.y
        );
    }

    let link_center = label_ref
        .tags()
        .iter()
        .find(|tag| tag.kind == TagKind::Hyperlink)
        .and_then(|tag| tag.bounds.first())
        .map(Rect::center);
    drop(label_ref);

    if let Some(point) = link_center {
        if let Some(hit) = services.canvas.hit_test(point) {
            services.canvas.click(hit)?;
        }
    }

    let stats = services.pools.stats();
    log::info!(
        "Pools: {} created, {} acquired, {} released",
        stats.created,
        stats.acquired,
        stats.released
    );

    if let Ok(label) = Rc::try_unwrap(label) {
        label.into_inner().destroy(&mut services);
    }
    services.shutdown();

    log::info!("Label demo finished");
    Ok(())
}
