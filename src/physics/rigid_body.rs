use crate::integrators::rk4::RK4;
use crate::models::RigidBodyState;
use crate::numerics::quaternion::Quaternion;
use crate::physics::dynamics::SpacecraftDynamics;
use nalgebra as na;

/// Rigid body with force/torque accumulators, advanced by a fixed-step
/// RK4 integrator. Accumulators are cleared after every step.
#[derive(Debug, Clone)]
pub struct RigidBody {
    state: RigidBodyState,
    force: na::Vector3<f64>,
    torque: na::Vector3<f64>,
}

impl RigidBody {
    pub fn new(state: RigidBodyState) -> Self {
        Self {
            state,
            force: na::Vector3::zeros(),
            torque: na::Vector3::zeros(),
        }
    }

    pub fn state(&self) -> &RigidBodyState {
        &self.state
    }

    pub fn position(&self) -> na::Vector3<f64> {
        self.state.position
    }

    pub fn velocity(&self) -> na::Vector3<f64> {
        self.state.velocity
    }

    pub fn orientation(&self) -> Quaternion {
        self.state.quaternion
    }

    pub fn angular_velocity(&self) -> na::Vector3<f64> {
        self.state.angular_velocity
    }

    /// Accumulates a world-frame torque.
    pub fn apply_torque(&mut self, world_torque: &na::Vector3<f64>) {
        self.torque += world_torque;
    }

    /// Accumulates a body-frame force acting at a body-frame point.
    pub fn apply_local_force(&mut self, force: &na::Vector3<f64>, point: &na::Vector3<f64>) {
        let q = &self.state.quaternion;
        self.force += q.rotate(force);
        self.torque += q.rotate(&point.cross(force));
    }

    pub fn pending_force(&self) -> na::Vector3<f64> {
        self.force
    }

    pub fn pending_torque(&self) -> na::Vector3<f64> {
        self.torque
    }

    pub fn set_mass(&mut self, mass: f64) {
        self.state.mass = mass;
    }

    pub fn set_inertia(&mut self, inertia: na::Vector3<f64>) {
        self.state.inertia = inertia;
    }

    pub fn step(&mut self, dt: f64) {
        let dynamics = SpacecraftDynamics::new(self.force, self.torque);
        let integrator = RK4::new(dynamics);
        let mut next = integrator.integrate(&self.state, dt);
        next.quaternion = next.quaternion.normalize();
        self.state = next;
        self.clear_accumulators();
    }

    pub fn zero_velocities(&mut self) {
        self.state.velocity = na::Vector3::zeros();
        self.state.angular_velocity = na::Vector3::zeros();
    }

    pub fn reset_to(&mut self, position: na::Vector3<f64>, orientation: Quaternion) {
        self.state.position = position;
        self.state.quaternion = orientation;
        self.zero_velocities();
        self.clear_accumulators();
    }

    pub fn clear_accumulators(&mut self) {
        self.force = na::Vector3::zeros();
        self.torque = na::Vector3::zeros();
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut RigidBodyState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_body() -> RigidBody {
        let mut state = RigidBodyState::zero();
        state.mass = 2.0;
        state.inertia = na::Vector3::new(1.0, 1.0, 1.0);
        state.quaternion = Quaternion::identity();
        RigidBody::new(state)
    }

    #[test]
    fn offset_force_produces_torque() {
        let mut body = unit_body();
        body.apply_local_force(&na::Vector3::new(0.0, 1.0, 0.0), &na::Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(body.pending_force(), na::Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(body.pending_torque(), na::Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn local_force_follows_attitude() {
        let mut body = unit_body();
        body.state_mut().quaternion =
            Quaternion::from_axis_angle(&na::Vector3::z(), std::f64::consts::FRAC_PI_2);
        body.apply_local_force(&na::Vector3::x(), &na::Vector3::zeros());
        assert_relative_eq!(body.pending_force(), na::Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn constant_force_integrates_linearly() {
        let mut body = unit_body();
        for _ in 0..60 {
            body.apply_local_force(&na::Vector3::new(2.0, 0.0, 0.0), &na::Vector3::zeros());
            body.step(1.0 / 60.0);
        }
        assert_relative_eq!(body.velocity().x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(body.position().x, 0.5, epsilon = 1e-9);
        assert_eq!(body.pending_force(), na::Vector3::zeros());
    }

    #[test]
    fn torque_spins_up_body() {
        let mut body = unit_body();
        body.apply_torque(&na::Vector3::new(0.0, 0.0, 0.5));
        body.step(1.0);
        assert_relative_eq!(body.angular_velocity().z, 0.5, epsilon = 1e-3);
        assert_relative_eq!(body.orientation().norm(), 1.0, epsilon = 1e-12);
    }
}
