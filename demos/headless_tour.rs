//! Drives the showcase without a window: load both scenes, scroll down the
//! page, swap a skin and print what a renderer would draw.
//!
//! Usage: `cargo run --example headless_tour -- <asset-root>`
//! (`RUST_LOG=debug` for load and transition details)

use anyhow::{bail, Context, Result};
use keyscene::prelude::*;

const FRAME: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    env_logger::init();

    let asset_root = std::env::args().nth(1).unwrap_or_else(|| "./public".to_string());
    let mut app = keyscene::from_asset_root(&asset_root);
    app.handle_event(AppEvent::Resized {
        width: 1920,
        height: 1080,
    });

    // Loads resolve on the task queue; give them a few frames
    for _ in 0..5 {
        app.frame(FRAME);
    }
    if app.configurator().controller().instance().is_none() {
        bail!("keyboard model did not load from {}", asset_root);
    }

    let stats = app.hero().scene().get_statistics();
    println!(
        "hero: {} objects, {} meshes, {} triangles",
        stats.object_count, stats.mesh_count, stats.total_triangles
    );

    for step in 0..=16 {
        app.handle_event(AppEvent::Scrolled {
            y: step as f32 * 100.0,
        });
        app.frame(FRAME);
    }
    for _ in 0..120 {
        app.frame(FRAME);
    }
    let camera = app.hero().scene().camera.position;
    println!(
        "scrolled: hero progress {:.2}, camera at ({:.2}, {:.2}, {:.2})",
        app.hero().scroll_progress(),
        camera.x,
        camera.y,
        camera.z
    );

    let theme = list_themes()
        .get(1)
        .context("no themes registered")?;
    app.handle_event(AppEvent::ThemeClicked {
        id: theme.id.to_string(),
    });
    while app.configurator().controller().is_transitioning() || app.frame_count() < 200 {
        app.frame(FRAME);
    }

    let controller = app.configurator().controller();
    println!(
        "configurator: theme {:?} after {} frames",
        controller.active_theme(),
        app.frame_count()
    );
    for button in controller.buttons().iter() {
        println!("  [{}] {}", if button.enabled { "x" } else { " " }, button.label);
    }

    Ok(())
}
