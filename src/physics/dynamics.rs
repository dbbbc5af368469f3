use super::attitude::{angular_acceleration, quaternion_derivative};
use crate::models::RigidBodyState;
use nalgebra as na;

pub trait EquationsOfMotion {
    type State;

    fn compute_derivative(&self, state: &Self::State) -> Self::State;
}

/// Free-flying rigid body under constant world-frame force and torque
/// for the duration of one step.
pub struct SpacecraftDynamics {
    force: na::Vector3<f64>,
    torque: na::Vector3<f64>,
}

impl SpacecraftDynamics {
    pub fn new(force: na::Vector3<f64>, torque: na::Vector3<f64>) -> Self {
        Self { force, torque }
    }
}

impl EquationsOfMotion for SpacecraftDynamics {
    type State = RigidBodyState;

    fn compute_derivative(&self, state: &RigidBodyState) -> RigidBodyState {
        let mut derivative = RigidBodyState::zero();

        derivative.position = state.velocity;
        if state.mass > 0.0 {
            derivative.velocity = self.force / state.mass;
        }

        // Torque is held in the world frame and resolved at each stage attitude
        let body_torque = state.quaternion.inverse_rotate(&self.torque);
        derivative.angular_velocity = angular_acceleration(state, &body_torque);

        derivative.quaternion = quaternion_derivative(state);

        derivative
    }
}
