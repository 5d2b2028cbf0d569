use anyhow::Result;
use log::{info, warn};
use std::time::{Duration, Instant};

use cityscape_sim::config::SceneConfig;
use cityscape_sim::scene::Scene;
use cityscape_sim::simulation::SignalColor;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();
    info!("Starting city scene simulation (console mode)");

    // Load configuration, falling back to defaults when no file is present
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "scene.toml".to_string());
    let config = match SceneConfig::load_from_file(&config_path) {
        Ok(config) => {
            info!("Loaded configuration from {}", config_path);
            config
        }
        Err(e) => {
            warn!("Could not load {} ({}), using defaults", config_path, e);
            SceneConfig::default()
        }
    };

    let mut scene = Scene::build(&config)?;
    info!(
        "Scene ready: terrain seed {}, road length {:.1}, {} vehicles",
        scene.terrain.seed(),
        scene.road.total_length(),
        scene.state.vehicles.len()
    );

    // Run the frame loop for a fixed span at a 60 FPS timestep
    let dt = 1.0 / 60.0;
    let run_duration = Duration::from_secs(30);
    let start_time = Instant::now();
    let mut last_report = Instant::now();
    let mut frame_count = 0u64;

    while start_time.elapsed() < run_duration {
        // A tick fault is fatal: halt instead of continuing with partially
        // updated state.
        if let Err(e) = scene.update(dt) {
            log::error!("Simulation fault, halting: {}", e);
            return Err(e);
        }

        frame_count += 1;

        if last_report.elapsed() >= Duration::from_secs(1) {
            let greens = scene
                .engine
                .registry()
                .fixtures()
                .iter()
                .filter(|f| f.color == SignalColor::Green)
                .count();

            info!(
                "t={:.1}s frame {}: {} vehicles ({} stopped), {} green fixtures, day {:.2}",
                scene.state.time,
                frame_count,
                scene.state.vehicles.len(),
                scene.state.stopped_count(),
                greens,
                scene.engine.day().fraction()
            );

            last_report = Instant::now();
        }

        std::thread::sleep(Duration::from_secs_f32(dt));
    }

    info!(
        "Simulation complete: {} frames, {:.1}s simulated",
        frame_count, scene.state.time
    );

    Ok(())
}
