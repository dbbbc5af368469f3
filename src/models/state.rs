use crate::models::spacecraft::MassProperties;
use crate::numerics::quaternion::Quaternion;
use nalgebra as na;

/// Kinematic state of the vehicle as seen by the rigid-body integrator.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBodyState {
    pub mass: f64,
    // Principal moments of inertia in the body frame
    pub inertia: na::Vector3<f64>,

    // Translational state (world frame)
    pub position: na::Vector3<f64>,
    pub velocity: na::Vector3<f64>,

    // Attitude state
    pub quaternion: Quaternion,
    pub angular_velocity: na::Vector3<f64>, // body frame
}

impl RigidBodyState {
    pub fn new<T: MassProperties>(
        properties: &T,
        position: na::Vector3<f64>,
        quaternion: Quaternion,
    ) -> Self {
        RigidBodyState {
            mass: properties.mass(),
            inertia: properties.inertia(),
            position,
            velocity: na::Vector3::zeros(),
            quaternion,
            angular_velocity: na::Vector3::zeros(),
        }
    }

    pub fn zero() -> Self {
        RigidBodyState {
            mass: 0.0,
            inertia: na::Vector3::zeros(),
            position: na::Vector3::zeros(),
            velocity: na::Vector3::zeros(),
            quaternion: Quaternion::new(0.0, 0.0, 0.0, 0.0),
            angular_velocity: na::Vector3::zeros(),
        }
    }
}

impl std::ops::Add for RigidBodyState {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        RigidBodyState {
            mass: self.mass,
            inertia: self.inertia,
            position: self.position + other.position,
            velocity: self.velocity + other.velocity,
            quaternion: Quaternion {
                data: self.quaternion.data + other.quaternion.data,
            },
            angular_velocity: self.angular_velocity + other.angular_velocity,
        }
    }
}

impl std::ops::Mul<f64> for RigidBodyState {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        RigidBodyState {
            mass: self.mass,
            inertia: self.inertia,
            position: self.position * scalar,
            velocity: self.velocity * scalar,
            quaternion: Quaternion {
                data: self.quaternion.data * scalar,
            },
            angular_velocity: self.angular_velocity * scalar,
        }
    }
}
