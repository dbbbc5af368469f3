use super::simulation::Simulation;
use crate::fsm::attitude_modes::AttitudeMode;
use crate::fsm::docking::{DockingMeasurement, DockingStatus};
use crate::numerics::quaternion::Quaternion;
use hifitime::Epoch;
use nalgebra as na;
use serde::{Serialize, Serializer};

fn serialize_epoch<S: Serializer>(epoch: &Epoch, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&epoch.to_string())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelTelemetry {
    pub name: String,
    pub angular_momentum: f64,
    pub saturation: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CmgTelemetry {
    pub name: String,
    pub angular_momentum: f64,
    pub gimbal_angle: f64,
    pub gimbal_rate: f64,
    pub near_singular: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockingTelemetry {
    pub status: DockingStatus,
    pub has_left_docking_box_once: bool,
    pub can_dock: bool,
    pub is_docked: bool,
    pub measurement: Option<DockingMeasurement>,
}

/// Read-only snapshot of everything a display needs after a step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    #[serde(serialize_with = "serialize_epoch")]
    pub epoch: Epoch,
    pub mission_elapsed_time: f64,
    pub position: na::Vector3<f64>,
    pub velocity: na::Vector3<f64>,
    pub angular_velocity: na::Vector3<f64>,
    pub attitude: Quaternion,
    pub total_mass: f64,
    pub fuel_mass: f64,
    pub fuel_fraction: f64,
    pub mode: AttitudeMode,
    pub thrusters_active: Vec<bool>,
    pub wheels: Vec<WheelTelemetry>,
    pub cmgs: Vec<CmgTelemetry>,
    pub desaturating: bool,
    pub docking: DockingTelemetry,
    pub paused: bool,
    pub status_message: Option<String>,
}

impl Telemetry {
    pub fn capture(sim: &Simulation) -> Self {
        let body = sim.body();
        let fuel = sim.fuel();
        let docking = sim.docking();

        Telemetry {
            epoch: sim.epoch(),
            mission_elapsed_time: sim.elapsed(),
            position: body.position(),
            velocity: body.velocity(),
            angular_velocity: body.angular_velocity(),
            attitude: body.orientation(),
            total_mass: fuel.total_mass(),
            fuel_mass: fuel.fuel_mass(),
            fuel_fraction: fuel.fraction_remaining(),
            mode: sim.mode(),
            thrusters_active: sim.thrusters().active_flags(),
            wheels: sim
                .wheels()
                .wheels()
                .iter()
                .map(|w| WheelTelemetry {
                    name: w.name.clone(),
                    angular_momentum: w.current_angular_momentum,
                    saturation: w.saturation(),
                })
                .collect(),
            cmgs: sim
                .cmgs()
                .cmgs()
                .iter()
                .map(|c| CmgTelemetry {
                    name: c.name.clone(),
                    angular_momentum: c.current_angular_momentum,
                    gimbal_angle: c.gimbal_angle,
                    gimbal_rate: c.gimbal_angular_velocity,
                    near_singular: c.is_near_singular(),
                })
                .collect(),
            desaturating: sim.is_desaturating(),
            docking: DockingTelemetry {
                status: docking.status(),
                has_left_docking_box_once: docking.has_left_docking_box_once(),
                can_dock: docking.can_dock(),
                is_docked: docking.is_docked(),
                measurement: docking.last_measurement().copied(),
            },
            paused: sim.is_paused(),
            status_message: sim.status_message().map(str::to_string),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
