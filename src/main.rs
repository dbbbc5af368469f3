use hifitime::Epoch;
use log::info;
use nalgebra as na;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spacedock::config::loader::{load_or_default, ConfigSource};
use spacedock::output::telemetry_writer::TelemetryWriter;
use spacedock::sim::Simulation;
use std::error::Error;
use std::path::Path;

const FRAME_DT: f64 = 1.0 / 60.0;
const SCENARIO_DURATION: f64 = 180.0; // seconds
const SAMPLE_EVERY: usize = 30; // frames between CSV rows

/// Scripted operator input: (time in s, key name, pressed).
const SCRIPT: &[(f64, &str, bool)] = &[
    // Back away from the port until the docking box is armed
    (1.0, "s", true),
    (4.0, "s", false),
    // Reaction wheels: yaw out and back
    (10.0, "m", true),
    (10.1, "m", false),
    (11.0, "j", true),
    (12.0, "j", false),
    (12.0, "l", true),
    (13.0, "l", false),
    (14.0, "t", true),
    (14.1, "t", false),
    // Hold station, then approach slowly
    (20.0, "x", true),
    (20.1, "x", false),
    (22.0, "w", true),
    (22.5, "w", false),
];

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arg = std::env::args().nth(1);
    let source = ConfigSource::from_arg(arg.as_deref());
    let (config, status) = load_or_default(&source);

    let start_time = Epoch::from_gregorian_utc(2025, 6, 1, 12, 0, 0, 0);
    let mut sim = Simulation::new(config, start_time).with_status(status);

    // Small random tumble so the attitude actuators have something to do
    let mut rng = StdRng::seed_from_u64(42);
    let kick = na::Vector3::new(
        rng.gen_range(-0.05..0.05),
        rng.gen_range(-0.05..0.05),
        rng.gen_range(-0.05..0.05),
    );
    sim.body_mut().apply_torque(&kick);

    let mut writer = TelemetryWriter::create(Path::new("output").join("telemetry.csv").as_path())?;

    let mut wall_time = 0.0;
    let mut next_event = 0;
    let mut frame = 0;
    while wall_time < SCENARIO_DURATION {
        while let Some(&(at, key, pressed)) = SCRIPT.get(next_event) {
            if at > wall_time {
                break;
            }
            sim.key_event(key, pressed);
            next_event += 1;
        }

        // Jittered frame times exercise the step accumulator
        let frame_dt = FRAME_DT * rng.gen_range(0.8..1.2);
        sim.advance(frame_dt);
        wall_time += frame_dt;

        if frame % SAMPLE_EVERY == 0 {
            writer.write(&sim.telemetry())?;
        }
        frame += 1;

        if sim.docking().is_docked() {
            writer.write(&sim.telemetry())?;
            info!("Docked at t={:.2}s", sim.elapsed());
            break;
        }
    }

    writer.flush()?;
    let telemetry = sim.telemetry();
    println!("{}", serde_json::to_string_pretty(&telemetry)?);
    println!("Telemetry has been written to output/telemetry.csv");

    Ok(())
}
