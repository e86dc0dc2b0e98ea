use anyhow::Result;
use instant::Instant;
use log::info;
use std::time::Duration;

use intersection_sim::{
    config::SimulationConfig,
    simulation::{PerformanceTracker, RunState, Simulation},
};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();
    info!("Starting Intersection Simulator (Console Mode)");

    // Load configuration
    let config = SimulationConfig::load_from_files("layout.toml", "scenario.toml")?;
    info!(
        "Loaded configuration: {:?} route, {} cars, signals {}",
        config.scenario.run.route,
        config.scenario.flows.total(config.scenario.run.route),
        if config.scenario.signal.enabled { "enabled" } else { "disabled" }
    );

    let run_duration_ms = config.scenario.run.duration_ms;
    let mut simulation = Simulation::new(config);
    simulation.start();

    let mut performance_tracker = PerformanceTracker::new(120);

    // ~60 ticks per second against the wall clock
    let target_frame_time = Duration::from_secs_f64(1.0 / 60.0);
    let clock = Instant::now();
    let mut last_status = Instant::now();
    let mut frame_count: u64 = 0;

    info!("Running simulation for {:.0} seconds...", run_duration_ms / 1000.0);

    while simulation.run_state() == RunState::Running {
        performance_tracker.start_frame();
        performance_tracker.start_update();

        simulation.tick(clock.elapsed().as_secs_f64() * 1000.0);

        performance_tracker.end_update();
        performance_tracker.end_frame();

        frame_count += 1;

        // Print status every second
        if last_status.elapsed() >= Duration::from_secs(1) {
            let snapshot = simulation.snapshot();
            info!(
                "Frame {}: t={:.1}s, phase {}, {} collided of {} cars, {:.1} FPS",
                frame_count,
                snapshot.time_ms / 1000.0,
                snapshot.phase,
                simulation.state().collided_count(),
                snapshot.vehicles.len(),
                performance_tracker.fps()
            );

            last_status = Instant::now();
        }

        // Sleep to maintain target framerate
        let elapsed = performance_tracker.average_frame_time();
        if elapsed < target_frame_time {
            std::thread::sleep(target_frame_time - elapsed);
        }
    }

    // Final statistics
    let snapshot = simulation.snapshot();
    info!("Simulation completed!");
    info!("Total frames: {}", frame_count);
    info!("Simulated time: {:.2}s", snapshot.time_ms / 1000.0);
    info!(
        "Final state: {} cars, {} collided, phase {}",
        snapshot.vehicles.len(),
        simulation.state().collided_count(),
        snapshot.phase
    );
    info!(
        "Average frame time: {:.2}ms (update {:.2}ms)",
        performance_tracker.average_frame_time().as_secs_f64() * 1000.0,
        performance_tracker.average_update_time().as_secs_f64() * 1000.0
    );

    Ok(())
}
