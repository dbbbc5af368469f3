use crate::sim::telemetry::Telemetry;
use csv::Writer;
use std::error::Error;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 22] = [
    "UTC Time",
    "Time (s)",
    "Mode",
    "Position X (m)",
    "Position Y (m)",
    "Position Z (m)",
    "Velocity X (m/s)",
    "Velocity Y (m/s)",
    "Velocity Z (m/s)",
    "Quaternion W",
    "Quaternion X",
    "Quaternion Y",
    "Quaternion Z",
    "Angular Velocity X (rad/s)",
    "Angular Velocity Y (rad/s)",
    "Angular Velocity Z (rad/s)",
    "Total Mass (kg)",
    "Fuel (kg)",
    "Active Thrusters",
    "Wheel Momentum (N⋅m⋅s)",
    "Desaturating",
    "Docking",
];

/// CSV log of telemetry snapshots, one row per call to `write`.
pub struct TelemetryWriter<W: Write> {
    writer: Writer<W>,
}

impl TelemetryWriter<File> {
    /// Creates the parent directory if needed and truncates any existing file.
    pub fn create(path: &Path) -> Result<Self, Box<dyn Error>> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        Self::new(File::create(path)?)
    }
}

impl<W: Write> TelemetryWriter<W> {
    pub fn new(inner: W) -> Result<Self, Box<dyn Error>> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(HEADER)?;
        Ok(Self { writer })
    }

    pub fn write(&mut self, t: &Telemetry) -> Result<(), Box<dyn Error>> {
        let q = &t.attitude;
        let active = t.thrusters_active.iter().filter(|a| **a).count();
        let wheel_momentum: f64 = t
            .wheels
            .iter()
            .map(|w| w.angular_momentum * w.angular_momentum)
            .sum::<f64>()
            .sqrt();

        self.writer.write_record(&[
            t.epoch.to_string(),
            t.mission_elapsed_time.to_string(),
            t.mode.to_string(),
            t.position.x.to_string(),
            t.position.y.to_string(),
            t.position.z.to_string(),
            t.velocity.x.to_string(),
            t.velocity.y.to_string(),
            t.velocity.z.to_string(),
            q.scalar().to_string(),
            q.vector()[0].to_string(),
            q.vector()[1].to_string(),
            q.vector()[2].to_string(),
            t.angular_velocity.x.to_string(),
            t.angular_velocity.y.to_string(),
            t.angular_velocity.z.to_string(),
            t.total_mass.to_string(),
            t.fuel_mass.to_string(),
            active.to_string(),
            wheel_momentum.to_string(),
            t.desaturating.to_string(),
            t.docking.status.to_string(),
        ])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Box<dyn Error>> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, Box<dyn Error>> {
        self.writer
            .into_inner()
            .map_err(|e| Box::new(e.into_error()) as Box<dyn Error>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::DEFAULT_SPACECRAFT;
    use crate::sim::Simulation;
    use hifitime::Epoch;

    #[test]
    fn writes_header_and_rows() {
        let mut sim = Simulation::new(
            DEFAULT_SPACECRAFT.clone(),
            Epoch::from_gregorian_utc_at_midnight(2025, 1, 1),
        );
        let mut writer = TelemetryWriter::new(Vec::new()).unwrap();
        for _ in 0..3 {
            sim.step();
            writer.write(&sim.telemetry()).unwrap();
        }
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("UTC Time,Time (s),Mode"));
        assert_eq!(lines[1].split(',').count(), HEADER.len());
        assert!(lines[3].contains("Thrusters"));
    }

    #[test]
    fn create_makes_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("telemetry.csv");
        let mut writer = TelemetryWriter::create(&path).unwrap();
        writer.flush().unwrap();
        assert!(path.exists());
    }
}
