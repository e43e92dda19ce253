//! Sand Sim headless runner
//!
//! Usage: `sand-sim [settings.json] [ticks] [snapshot.json] [boxed|fall-through|erasing]`
//!
//! Builds a small scene, drives it with simulated frames at the configured
//! frame rate and optionally writes a snapshot of the final state.

use std::error::Error;

use sand_sim::defaults::ProcessorDefaults;
use sand_sim::{BoundaryMode, FixedStepDriver, SandGame, Settings};

const DEFAULT_TICKS: u64 = 600;
const SETTINGS_FILE: &str = "sand-sim.json";

fn main() {
    env_logger::init();
    log::info!("Sand Sim (headless) starting...");

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let mut settings = Settings::load(args.next().unwrap_or_else(|| SETTINGS_FILE.to_string()));
    let ticks = match args.next() {
        Some(value) => value.parse()?,
        None => DEFAULT_TICKS,
    };
    let snapshot_path = args.next();
    if let Some(name) = args.next() {
        match BoundaryMode::from_str(&name) {
            Some(mode) => settings.boundary = mode,
            None => log::warn!("Unknown boundary mode '{name}', keeping {}", settings.boundary.as_str()),
        }
    }

    let mut game = SandGame::new(&settings)?;
    build_scene(&mut game);

    let mut driver = FixedStepDriver::from_settings(&settings);
    let frame = 1.0 / f64::from(settings.frames_per_second.max(1));
    let mut time = 0.0;
    driver.start();
    while game.iteration() < ticks {
        time += frame;
        driver.update(frame, time, || game.do_processing());
    }
    driver.stop();

    log::info!(
        "Ran {} ticks ({} ticks/s simulated), {} non-air cells, {} entities",
        game.iteration(),
        driver.iterations_per_second(),
        game.area().count_non_air(),
        game.entities().len()
    );

    if let Some(path) = snapshot_path {
        game.create_snapshot()?.save(path)?;
    }
    Ok(())
}

/// Soil floor, a sand heap, a pool and a wall between them
fn build_scene(game: &mut SandGame) {
    let defaults = ProcessorDefaults::default();
    let (width, height) = (game.width(), game.height());
    let mut graphics = game.graphics();

    graphics.draw_rectangle(0, height - height / 8, width - 1, height - 1, &defaults.soil);
    graphics.draw_line(width / 2, height / 3, width / 2, height - 1, 3, &defaults.wall);
    graphics.draw_rectangle(width / 8, 0, width / 3, height / 5, &defaults.sand);
    graphics.draw_rectangle(width / 2 + 4, height / 4, width - width / 8, height / 2, &defaults.water);
}
