//! Glass Card Demo
//!
//! Mounts a card-style wrapper around a glass surface, drives it through the
//! readiness signals a host would deliver, and prints each frame's layer tree
//! followed by the filter asset.
//!
//! Run with:
//! `cargo run -p glaze_glass --example glass_card`

use glaze_glass::prelude::*;

/// A thin consumer in the shape of a derived widget: picks a preset, adds its
/// own classes, and hands content to the surface.
struct GlassCard {
    key: SurfaceKey,
}

const CARD_TOML: &str = r#"
variant = "subtle"

[overrides]
radius = 18.0

[transition]
duration_ms = 240
easing = "ease-in-out"

[attributes]
class_names = ["card"]
style = { padding = "16px" }
"#;

impl GlassCard {
    fn mount(ctx: &mut GlassContext, content: UiNode) -> Result<Self, GlassError> {
        let config = SurfaceConfig::from_toml_str(CARD_TOML)?;
        Ok(Self {
            key: ctx.mount(config, Layer::ui(content)),
        })
    }
}

fn print_tree(layer: &Layer) {
    layer.traverse(|layer, depth| {
        let indent = "  ".repeat(depth);
        let name = layer.name().unwrap_or("-");
        match layer {
            Layer::Opacity { value, .. } => println!("{indent}opacity {value:.2}"),
            Layer::Filtered { filter, .. } => println!("{indent}{name} -> {}", filter.url()),
            Layer::Border { color, .. } => println!("{indent}{name} {}", color.to_css()),
            _ => println!("{indent}{name}"),
        }
    });
}

fn main() -> Result<(), GlassError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut ctx = GlassContext::new();
    let card = GlassCard::mount(&mut ctx, UiNode::new(1))?;

    // The host reports layout first, then the asset's load signal.
    if let Some(id) = ctx.get(card.key).map(GlassSurface::id) {
        ctx.dispatch(&mut Event::resize(id, 320.0, 180.0));
        ctx.dispatch(&mut Event::asset_load(id));
    }

    let mut frame = 0;
    loop {
        let animating = ctx.tick_all(60.0);
        if let Some(surface) = ctx.get(card.key) {
            println!(
                "frame {frame}: effect {:.2}, fallback {}",
                surface.effect_opacity(),
                surface.should_show_fallback()
            );
            if !animating {
                print_tree(&surface.render());
                println!("{}", surface.filter_asset());
            }
        }
        if !animating {
            break;
        }
        frame += 1;
    }

    ctx.unmount(card.key);
    tracing::info!("live filter ids after unmount: {}", ctx.allocator().live_count());
    Ok(())
}
