use crate::models::RigidBodyState;
use crate::numerics::quaternion::{compute_quaternion_derivative, Quaternion};
use nalgebra as na;

/// Euler's rotational equation for a body with principal inertia.
/// `body_torque` is expressed in the body frame.
pub fn angular_acceleration(
    state: &RigidBodyState,
    body_torque: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    let inertia = na::Matrix3::from_diagonal(&state.inertia);
    let w = state.angular_velocity;
    let gyro = w.cross(&(inertia * w));

    match inertia.try_inverse() {
        Some(inv) => inv * (body_torque - gyro),
        None => na::Vector3::zeros(),
    }
}

pub fn quaternion_derivative(state: &RigidBodyState) -> Quaternion {
    // Only use body angular velocity for quaternion propagation
    compute_quaternion_derivative(&state.quaternion, &state.angular_velocity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn torque_about_principal_axis() {
        let mut state = RigidBodyState::zero();
        state.inertia = na::Vector3::new(2.0, 4.0, 8.0);
        let alpha = angular_acceleration(&state, &na::Vector3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(alpha, na::Vector3::new(0.5, 0.25, 0.125), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_inertia_yields_no_acceleration() {
        let state = RigidBodyState::zero();
        let alpha = angular_acceleration(&state, &na::Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(alpha, na::Vector3::zeros());
    }
}
