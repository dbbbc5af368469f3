//! Control moment gyroscopes with axis-decoupled allocation.
//!
//! Each CMG steers at most one body axis. The gimbal rate needed for a
//! commanded torque comes from the small-angle precession relation
//! `τ ≈ h · ω_gimbal`; the torque actually delivered is then recomputed from
//! the clamped rate as `ḣ = (ĝ ω_gimbal) × (ŵ h)` with `ĝ = ŵ × gimbal`.
//! Singularities are detected and reported but not corrected here.

use crate::config::spacecraft::{CmgConfig, ControlAxis};
use crate::constants::{CMG_INITIAL_MOMENTUM_FRACTION, CMG_SINGULARITY_SIN, MIN_CONTROL_MOMENTUM};
use crate::physics::rigid_body::RigidBody;
use log::warn;
use nalgebra as na;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Cmg {
    pub name: String,
    pub wheel_orientation: na::Vector3<f64>,
    pub gimbal_orientation: na::Vector3<f64>,
    pub max_angular_momentum: f64,
    pub max_torque: f64,
    pub max_gimbal_rate: f64,
    pub controlled_axis: Option<ControlAxis>,
    pub current_angular_momentum: f64,
    pub gimbal_angle: f64,
    pub gimbal_angular_velocity: f64,
}

impl Cmg {
    pub fn from_config(index: usize, config: &CmgConfig) -> Self {
        let unit = |v: na::Vector3<f64>| v.try_normalize(1e-9).unwrap_or_else(na::Vector3::zeros);
        Self {
            name: config
                .name
                .clone()
                .unwrap_or_else(|| format!("CMG-{}", index + 1)),
            wheel_orientation: unit(config.wheel_orientation.to_vector()),
            gimbal_orientation: unit(config.gimbal_orientation.to_vector()),
            max_angular_momentum: config.max_angular_momentum,
            max_torque: config.max_torque,
            max_gimbal_rate: config.max_gimbal_rate,
            controlled_axis: config.resolved_axis(),
            current_angular_momentum: config.max_angular_momentum * CMG_INITIAL_MOMENTUM_FRACTION,
            gimbal_angle: 0.0,
            gimbal_angular_velocity: 0.0,
        }
    }

    /// Precession axis. Zero when wheel and gimbal orientations are parallel.
    pub fn gimbal_axis(&self) -> na::Vector3<f64> {
        self.wheel_orientation
            .cross(&self.gimbal_orientation)
            .try_normalize(1e-9)
            .unwrap_or_else(na::Vector3::zeros)
    }

    /// Gimbal rate requested for `torque_cmd`, before clamping.
    pub fn required_rate(&self, torque_cmd: &na::Vector3<f64>) -> f64 {
        match self.controlled_axis {
            Some(axis) if self.current_angular_momentum > MIN_CONTROL_MOMENTUM => {
                -torque_cmd[axis.index()] / self.current_angular_momentum
            }
            _ => 0.0,
        }
    }

    /// Sets the clamped gimbal rate for this step and integrates the angle.
    pub fn command(&mut self, torque_cmd: &na::Vector3<f64>, dt: f64) -> f64 {
        let rate = self
            .required_rate(torque_cmd)
            .clamp(-self.max_gimbal_rate, self.max_gimbal_rate);
        self.gimbal_angular_velocity = rate;
        self.gimbal_angle += rate * dt;
        rate
    }

    /// Body-frame momentum rate produced by the current gimbal motion.
    pub fn momentum_rate(&self) -> na::Vector3<f64> {
        let omega = self.gimbal_axis() * self.gimbal_angular_velocity;
        let h = self.wheel_orientation * self.current_angular_momentum;
        omega.cross(&h)
    }

    pub fn is_near_singular(&self) -> bool {
        self.gimbal_angle.sin().abs() > CMG_SINGULARITY_SIN
    }

    pub fn reset(&mut self) {
        self.gimbal_angle = 0.0;
        self.gimbal_angular_velocity = 0.0;
    }
}

#[derive(Debug, Clone, Default)]
pub struct CmgArray {
    cmgs: Vec<Cmg>,
}

impl CmgArray {
    pub fn from_config(configs: &[CmgConfig]) -> Self {
        let cmgs: Vec<Cmg> = configs
            .iter()
            .enumerate()
            .map(|(i, c)| Cmg::from_config(i, c))
            .collect();

        if !cmgs.is_empty() {
            for axis in ControlAxis::ALL {
                if !cmgs.iter().any(|c| c.controlled_axis == Some(axis)) {
                    warn!("No CMG assigned to the {} axis; it has no CMG authority", axis);
                }
            }
        }
        for c in cmgs.iter().filter(|c| c.gimbal_axis().norm() == 0.0) {
            warn!("CMG '{}' has parallel wheel and gimbal axes and cannot produce torque", c.name);
        }

        Self { cmgs }
    }

    pub fn is_empty(&self) -> bool {
        self.cmgs.is_empty()
    }

    pub fn cmgs(&self) -> &[Cmg] {
        &self.cmgs
    }

    pub fn authority(&self) -> f64 {
        self.cmgs.iter().map(|c| c.max_torque).fold(0.0, f64::max)
    }

    /// Steers every CMG toward the commanded torque and applies the summed
    /// geometric torque to the body. Returns the world-frame torque applied.
    pub fn apply(
        &mut self,
        torque_cmd: &na::Vector3<f64>,
        body: &mut RigidBody,
        dt: f64,
    ) -> na::Vector3<f64> {
        let total: na::Vector3<f64> = self
            .cmgs
            .iter_mut()
            .map(|c| {
                c.command(torque_cmd, dt);
                c.momentum_rate()
            })
            .sum();
        let world = body.orientation().rotate(&total);
        body.apply_torque(&world);
        world
    }

    pub fn singular_indices(&self) -> Vec<usize> {
        self.cmgs
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_near_singular())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn any_near_singular(&self) -> bool {
        self.cmgs.iter().any(Cmg::is_near_singular)
    }

    pub fn nudge_gimbal(&mut self, index: usize, delta: f64) {
        if let Some(c) = self.cmgs.get_mut(index) {
            c.gimbal_angle += delta;
        }
    }

    pub fn reset(&mut self) {
        self.cmgs.iter_mut().for_each(Cmg::reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::DEFAULT_SPACECRAFT;
    use crate::models::RigidBodyState;
    use crate::numerics::quaternion::Quaternion;
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn body() -> RigidBody {
        let mut state = RigidBodyState::zero();
        state.mass = 100.0;
        state.inertia = na::Vector3::new(10.0, 10.0, 10.0);
        state.quaternion = Quaternion::identity();
        RigidBody::new(state)
    }

    fn default_array() -> CmgArray {
        CmgArray::from_config(&DEFAULT_SPACECRAFT.cmgs)
    }

    #[test]
    fn flywheels_start_spinning() {
        let array = default_array();
        for c in array.cmgs() {
            assert_relative_eq!(c.current_angular_momentum, 0.8 * c.max_angular_momentum);
        }
    }

    #[test_case(na::Vector3::new(0.1, 0.0, 0.0); "roll")]
    #[test_case(na::Vector3::new(0.0, -0.2, 0.0); "pitch")]
    #[test_case(na::Vector3::new(0.0, 0.0, 0.3); "yaw")]
    fn small_commands_are_delivered(cmd: na::Vector3<f64>) {
        let mut array = default_array();
        let mut body = body();
        let applied = array.apply(&cmd, &mut body, 1.0 / 60.0);
        assert_relative_eq!(applied, cmd, epsilon = 1e-12);
        // The spare unit holds still
        assert_eq!(array.cmgs()[3].gimbal_angular_velocity, 0.0);
    }

    #[test_case(1e3; "large")]
    #[test_case(-1e6; "huge negative")]
    fn gimbal_rate_is_bounded(magnitude: f64) {
        let mut array = default_array();
        let mut body = body();
        array.apply(&na::Vector3::new(magnitude, magnitude, magnitude), &mut body, 0.1);
        for c in array.cmgs() {
            assert!(c.gimbal_angular_velocity.abs() <= c.max_gimbal_rate);
        }
    }

    #[test]
    fn negligible_momentum_has_no_authority() {
        let mut cmg = default_array().cmgs()[0].clone();
        cmg.current_angular_momentum = 0.05;
        assert_eq!(cmg.command(&na::Vector3::new(1.0, 0.0, 0.0), 0.1), 0.0);
    }

    #[test]
    fn singularity_detection() {
        let mut array = default_array();
        assert!(!array.any_near_singular());
        array.nudge_gimbal(1, std::f64::consts::FRAC_PI_2);
        assert_eq!(array.singular_indices(), vec![1]);
        array.reset();
        assert!(!array.any_near_singular());
        // Reset leaves the flywheels spinning
        assert!(array.cmgs()[1].current_angular_momentum > 0.0);
    }

    #[test]
    fn unassigned_cmgs_hold_neutral() {
        let mut configs = DEFAULT_SPACECRAFT.cmgs.clone();
        for c in &mut configs {
            c.controlled_axis = None;
            c.name = Some("spare".to_string());
        }
        let mut array = CmgArray::from_config(&configs);
        let applied = array.apply(&na::Vector3::new(1.0, 1.0, 1.0), &mut body(), 0.1);
        assert_eq!(applied, na::Vector3::zeros());
    }
}
