use crate::config::spacecraft::ReactionWheelConfig;
use crate::physics::rigid_body::RigidBody;
use nalgebra as na;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReactionWheel {
    pub name: String,
    pub axis: na::Vector3<f64>, // body-frame spin axis, unit
    pub max_angular_momentum: f64,
    // Advisory only: the momentum capacity is the enforced limit
    pub max_torque: f64,
    pub current_angular_momentum: f64,
}

impl ReactionWheel {
    pub fn from_config(index: usize, config: &ReactionWheelConfig) -> Self {
        Self {
            name: config
                .name
                .clone()
                .unwrap_or_else(|| format!("RW-{}", index + 1)),
            axis: config
                .orientation
                .to_vector()
                .try_normalize(1e-9)
                .unwrap_or_else(na::Vector3::zeros),
            max_angular_momentum: config.max_angular_momentum,
            max_torque: config.max_torque,
            current_angular_momentum: 0.0,
        }
    }

    /// Spins the wheel toward the commanded body torque and returns the
    /// torque actually delivered along the spin axis. A wheel at its
    /// momentum limit in the requested direction delivers nothing.
    pub fn command(&mut self, torque_cmd: &na::Vector3<f64>, dt: f64) -> f64 {
        if dt <= 0.0 {
            return 0.0;
        }
        let along = self.axis.dot(torque_cmd);
        let h = self.current_angular_momentum;
        let max = self.max_angular_momentum;

        let delivered = if along > 0.0 {
            let max_possible = ((max - h) / dt).max(0.0);
            along.min(max_possible)
        } else if along < 0.0 {
            let max_possible = ((h + max) / dt).max(0.0);
            -(-along).min(max_possible)
        } else {
            0.0
        };

        self.current_angular_momentum = (h + delivered * dt).clamp(-max, max);
        delivered
    }

    pub fn momentum_vector(&self) -> na::Vector3<f64> {
        self.axis * self.current_angular_momentum
    }

    pub fn saturation(&self) -> f64 {
        self.current_angular_momentum.abs() / self.max_angular_momentum
    }

    /// Moves stored momentum toward zero by up to `amount`.
    pub fn bleed(&mut self, amount: f64) {
        let h = self.current_angular_momentum;
        self.current_angular_momentum = h.signum() * (h.abs() - amount.max(0.0)).max(0.0);
    }

    pub fn reset(&mut self) {
        self.current_angular_momentum = 0.0;
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReactionWheelArray {
    wheels: Vec<ReactionWheel>,
}

impl ReactionWheelArray {
    pub fn from_config(configs: &[ReactionWheelConfig]) -> Self {
        Self {
            wheels: configs
                .iter()
                .enumerate()
                .map(|(i, c)| ReactionWheel::from_config(i, c))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.wheels.is_empty()
    }

    pub fn wheels(&self) -> &[ReactionWheel] {
        &self.wheels
    }

    pub fn wheels_mut(&mut self) -> &mut [ReactionWheel] {
        &mut self.wheels
    }

    /// Largest rated torque, used to scale attitude commands.
    pub fn authority(&self) -> f64 {
        self.wheels.iter().map(|w| w.max_torque).fold(0.0, f64::max)
    }

    /// Drives every wheel and applies the reaction torque to the body.
    /// Returns the world-frame torque applied.
    pub fn apply(
        &mut self,
        torque_cmd: &na::Vector3<f64>,
        body: &mut RigidBody,
        dt: f64,
    ) -> na::Vector3<f64> {
        let reaction_body: na::Vector3<f64> = self
            .wheels
            .iter_mut()
            .map(|w| -w.command(torque_cmd, dt) * w.axis)
            .sum();
        let world = body.orientation().rotate(&reaction_body);
        body.apply_torque(&world);
        world
    }

    pub fn total_momentum(&self) -> na::Vector3<f64> {
        self.wheels.iter().map(|w| w.momentum_vector()).sum()
    }

    pub fn max_abs_momentum(&self) -> f64 {
        self.wheels
            .iter()
            .map(|w| w.current_angular_momentum.abs())
            .fold(0.0, f64::max)
    }

    pub fn reset(&mut self) {
        self.wheels.iter_mut().for_each(ReactionWheel::reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::spacecraft::Vec3Config;
    use crate::models::RigidBodyState;
    use crate::numerics::quaternion::Quaternion;
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn wheel(max_h: f64) -> ReactionWheel {
        ReactionWheel::from_config(
            0,
            &ReactionWheelConfig {
                name: None,
                position: Vec3Config::default(),
                orientation: Vec3Config::new(1.0, 0.0, 0.0),
                max_angular_momentum: max_h,
                max_torque: 0.5,
            },
        )
    }

    fn body() -> RigidBody {
        let mut state = RigidBodyState::zero();
        state.mass = 100.0;
        state.inertia = na::Vector3::new(10.0, 10.0, 10.0);
        state.quaternion = Quaternion::identity();
        RigidBody::new(state)
    }

    #[test]
    fn linear_accumulation_before_saturation() {
        let mut w = wheel(15.0);
        let cmd = na::Vector3::new(0.5, 0.0, 0.0);
        for _ in 0..30 {
            w.command(&cmd, 1.0 / 60.0);
        }
        assert_relative_eq!(w.current_angular_momentum, 0.25, epsilon = 1e-12);
    }

    #[test_case(1.0, 1.0; "positive command")]
    #[test_case(-1.0, -1.0; "negative command")]
    fn saturates_at_capacity(sign: f64, expected_sign: f64) {
        let mut w = wheel(1.0);
        let cmd = na::Vector3::new(sign * 10.0, 0.0, 0.0);
        for _ in 0..100 {
            w.command(&cmd, 0.1);
            assert!(w.current_angular_momentum.abs() <= w.max_angular_momentum);
        }
        assert_relative_eq!(w.current_angular_momentum, expected_sign);
        assert_eq!(w.command(&cmd, 0.1), 0.0);
    }

    #[test]
    fn saturated_wheel_can_unload() {
        let mut w = wheel(1.0);
        w.current_angular_momentum = 1.0;
        let delivered = w.command(&na::Vector3::new(-2.0, 0.0, 0.0), 0.1);
        assert_relative_eq!(delivered, -2.0);
        assert_relative_eq!(w.current_angular_momentum, 0.8);
    }

    #[test]
    fn off_axis_command_is_projected() {
        let mut w = wheel(10.0);
        let delivered = w.command(&na::Vector3::new(0.3, 5.0, -2.0), 1.0);
        assert_relative_eq!(delivered, 0.3);
    }

    #[test]
    fn reaction_torque_opposes_wheel_spin_up() {
        let mut array = ReactionWheelArray {
            wheels: vec![wheel(15.0)],
        };
        let mut body = body();
        let dt = 1.0 / 60.0;
        let applied = array.apply(&na::Vector3::new(0.5, 0.0, 0.0), &mut body, dt);
        assert_relative_eq!(applied, na::Vector3::new(-0.5, 0.0, 0.0));

        let h_before = 0.0;
        body.step(dt);
        let h_after = array.wheels()[0].current_angular_momentum;
        // Body momentum change mirrors the wheel's
        let body_h = body.angular_velocity().x * 10.0;
        assert_relative_eq!(body_h, -(h_after - h_before), epsilon = 1e-9);
    }

    #[test]
    fn bleed_never_crosses_zero() {
        let mut w = wheel(10.0);
        w.current_angular_momentum = -0.3;
        w.bleed(0.2);
        assert_relative_eq!(w.current_angular_momentum, -0.1, epsilon = 1e-12);
        w.bleed(0.5);
        assert_eq!(w.current_angular_momentum.abs(), 0.0);
    }
}
