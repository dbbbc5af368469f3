use crate::config::spacecraft::DockingConfig;
use crate::models::RigidBodyState;
use crate::numerics::quaternion::Quaternion;
use log::info;
use nalgebra as na;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DockingStatus {
    NotDocked,
    Eligible,
    Docked,
}

impl fmt::Display for DockingStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DockingStatus::NotDocked => write!(f, "Not Docked"),
            DockingStatus::Eligible => write!(f, "Eligible"),
            DockingStatus::Docked => write!(f, "Docked"),
        }
    }
}

/// Pose and rate errors relative to the docking reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DockingMeasurement {
    pub position_delta: na::Vector3<f64>, // reference frame (m)
    pub distance: f64,
    pub angle_deg: f64,
    pub speed: f64,
    pub approach_speed: f64,
    pub transverse_speed: f64,
    pub angular_speed_deg: f64,
    pub in_box: bool,
    pub in_angle: bool,
    pub within_speed_limits: bool,
    pub within_angular_speed_limit: bool,
}

impl DockingMeasurement {
    pub fn qualified(&self) -> bool {
        self.in_box && self.in_angle && self.within_speed_limits && self.within_angular_speed_limit
    }
}

/// Evaluates `state` against the reference pose. Pure.
pub fn measure(
    state: &RigidBodyState,
    reference_position: &na::Vector3<f64>,
    reference_orientation: &Quaternion,
    limits: &DockingConfig,
) -> DockingMeasurement {
    let world_delta = state.position - reference_position;
    let position_delta = reference_orientation.inverse_rotate(&world_delta);
    let angle_deg = state.quaternion.angle_to(reference_orientation).to_degrees();

    let axis = reference_orientation.rotate(
        &limits
            .approach_axis
            .to_vector()
            .try_normalize(1e-9)
            .unwrap_or_else(na::Vector3::x),
    );
    let v = state.velocity;
    let along = v.dot(&axis);
    let transverse_speed = (v - axis * along).norm();
    let approach_speed = along.abs();
    let angular_speed_deg = state.angular_velocity.norm().to_degrees();

    let in_box = position_delta.iter().all(|d| d.abs() <= limits.box_half_width);
    let in_angle = angle_deg <= limits.max_angle_deg;
    let within_speed_limits =
        transverse_speed <= limits.max_transverse_speed && approach_speed <= limits.max_approach_speed;
    let within_angular_speed_limit = angular_speed_deg <= limits.max_angular_speed_deg;

    DockingMeasurement {
        position_delta,
        distance: world_delta.norm(),
        angle_deg,
        speed: v.norm(),
        approach_speed,
        transverse_speed,
        angular_speed_deg,
        in_box,
        in_angle,
        within_speed_limits,
        within_angular_speed_limit,
    }
}

pub struct DockingQualifier {
    limits: DockingConfig,
    initial_position: na::Vector3<f64>,
    initial_orientation: Quaternion,
    has_left_docking_box_once: bool,
    can_dock: bool,
    is_docked: bool,
    last: Option<DockingMeasurement>,
}

impl DockingQualifier {
    pub fn new(
        limits: DockingConfig,
        initial_position: na::Vector3<f64>,
        initial_orientation: Quaternion,
    ) -> Self {
        Self {
            limits,
            initial_position,
            initial_orientation,
            has_left_docking_box_once: false,
            can_dock: false,
            is_docked: false,
            last: None,
        }
    }

    pub fn status(&self) -> DockingStatus {
        if self.is_docked {
            DockingStatus::Docked
        } else if self.can_dock {
            DockingStatus::Eligible
        } else {
            DockingStatus::NotDocked
        }
    }

    pub fn is_docked(&self) -> bool {
        self.is_docked
    }

    pub fn can_dock(&self) -> bool {
        self.can_dock
    }

    pub fn has_left_docking_box_once(&self) -> bool {
        self.has_left_docking_box_once
    }

    pub fn last_measurement(&self) -> Option<&DockingMeasurement> {
        self.last.as_ref()
    }

    /// Replaces the thresholds. Session flags, including a docked latch,
    /// are kept; only an explicit undock or reset clears them.
    pub fn set_limits(&mut self, limits: DockingConfig) {
        self.limits = limits;
    }

    pub fn limits(&self) -> &DockingConfig {
        &self.limits
    }

    pub fn reference(&self) -> (na::Vector3<f64>, Quaternion) {
        (self.initial_position, self.initial_orientation)
    }

    /// Re-evaluates qualification for this step. Returns true when the
    /// vehicle latched into the docked state on this call.
    pub fn evaluate(&mut self, state: &RigidBodyState, time: f64) -> bool {
        let m = measure(state, &self.initial_position, &self.initial_orientation, &self.limits);
        self.last = Some(m);
        if self.is_docked {
            return false;
        }

        if !m.in_box && !self.has_left_docking_box_once {
            info!("Left docking box at t={:.2}s, docking armed", time);
            self.has_left_docking_box_once = true;
        }
        let previous = self.status();
        self.can_dock = self.has_left_docking_box_once && m.qualified();
        self.log_transition(previous, time);

        if self.can_dock && self.limits.auto_dock {
            return self.dock(time);
        }
        false
    }

    /// Manual dock request. Succeeds only while qualified.
    pub fn dock(&mut self, time: f64) -> bool {
        if self.is_docked || !self.can_dock {
            return false;
        }
        let previous = self.status();
        self.is_docked = true;
        self.log_transition(previous, time);
        true
    }

    /// Clears the docked latch and re-arms the leave-the-box requirement.
    pub fn undock(&mut self, time: f64) -> bool {
        if !self.is_docked {
            return false;
        }
        let previous = self.status();
        self.is_docked = false;
        self.can_dock = false;
        self.has_left_docking_box_once = false;
        self.log_transition(previous, time);
        true
    }

    pub fn reset(&mut self) {
        self.has_left_docking_box_once = false;
        self.can_dock = false;
        self.is_docked = false;
        self.last = None;
    }

    fn log_transition(&self, previous: DockingStatus, time: f64) {
        let current = self.status();
        if previous != current {
            info!(
                "Docking transition at t={:.2}s: {} -> {}",
                time, previous, current
            );
        }
    }
}
