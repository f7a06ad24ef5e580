//! Headless walk through the unboxing narrative.
//!
//! Usage: `cargo run --example unboxing [config.json]`
//!
//! Without a configuration file the built-in unboxing preset is used. The
//! demo clicks each hotspot in turn, the way a visitor would, and logs the
//! stage transitions. Run with `RUST_LOG=info` (or `debug`) to follow along.

use std::time::Duration;

use glam::{Vec2, Vec3};
use vitrine::choreography::script::{CAP_PROXY, CREAM_PROXY};
use vitrine::utils::Timer;
use vitrine::{Exhibit, ExhibitConfig};

const FRAME: Duration = Duration::from_millis(16);

/// Pixel position of a world point in the exhibit's viewport.
fn screen_of(exhibit: &Exhibit, world: Vec3) -> Option<Vec2> {
    let ndc = exhibit.camera()?.project(world);
    let size = exhibit.input().screen_size;
    Some(Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y))
}

fn annotation_at(exhibit: &Exhibit, name: &str) -> Option<Vec2> {
    let position = exhibit.annotations().get(name)?.position();
    screen_of(exhibit, position)
}

fn region_at(exhibit: &Exhibit, name: &str) -> Option<Vec2> {
    let desc = exhibit.config().regions.iter().find(|r| r.name == name)?;
    screen_of(exhibit, desc.position)
}

/// Runs frames in real time for `seconds`.
async fn play_for(exhibit: &mut Exhibit, timer: &mut Timer, seconds: f32) {
    let end = timer.elapsed + Duration::from_secs_f32(seconds);
    while timer.elapsed < end {
        tokio::time::sleep(FRAME).await;
        let dt = timer.tick();
        exhibit.update(dt);
    }
}

fn click(exhibit: &mut Exhibit, label: &str, at: Option<Vec2>) {
    let Some(pos) = at else {
        log::warn!("'{label}' is not on screen");
        return;
    };
    let fired = exhibit.handle_click(pos);
    log::info!("Click on '{label}' at {pos}: {fired} hotspot(s) fired");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => ExhibitConfig::from_json_file(path)?,
        None => ExhibitConfig::unboxing(),
    };
    let mut exhibit = Exhibit::new(config)?;

    // The narrative runs without the model; only the clips are missing.
    if let Err(err) = exhibit.load_configured_asset().await {
        log::warn!("Continuing without asset: {err}");
    }

    let mut timer = Timer::new();

    let at = annotation_at(&exhibit, "open");
    click(&mut exhibit, "open", at);
    play_for(&mut exhibit, &mut timer, 2.5).await;

    let at = region_at(&exhibit, CREAM_PROXY);
    click(&mut exhibit, CREAM_PROXY, at);
    play_for(&mut exhibit, &mut timer, 2.0).await;

    let at = region_at(&exhibit, CAP_PROXY);
    click(&mut exhibit, CAP_PROXY, at);
    play_for(&mut exhibit, &mut timer, 1.5).await;

    let at = annotation_at(&exhibit, "close");
    click(&mut exhibit, "close", at);
    play_for(&mut exhibit, &mut timer, 3.0).await;

    println!(
        "Finished in stage '{}' after {} frames ({:.1}s)",
        exhibit.stage_name(),
        exhibit.frame_count(),
        exhibit.time()
    );
    Ok(())
}
