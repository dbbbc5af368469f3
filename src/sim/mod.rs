pub mod simulation;
pub mod telemetry;

pub use simulation::{Simulation, StepReport};
pub use telemetry::Telemetry;
