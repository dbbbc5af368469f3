use nalgebra as na;
use serde::{Deserialize, Serialize};

/// Quaternion utilities for spacecraft attitude dynamics
/// Following scalar-first convention: q = [q0; q1; q2; q3] = [w; x; y; z]
/// Attitude quaternions rotate body-frame vectors into the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub data: na::Vector4<f64>,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Quaternion {
            data: na::Vector4::new(w, x, y, z),
        }
    }

    pub fn identity() -> Self {
        Quaternion::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Rotation of `angle` radians about `axis`. A zero axis yields identity.
    pub fn from_axis_angle(axis: &na::Vector3<f64>, angle: f64) -> Self {
        let norm = axis.norm();
        if norm < f64::EPSILON {
            return Self::identity();
        }
        let half = 0.5 * angle;
        let v = axis / norm * half.sin();
        Quaternion::new(half.cos(), v.x, v.y, v.z)
    }

    pub fn scalar(&self) -> f64 {
        self.data[0]
    }

    pub fn vector(&self) -> na::Vector3<f64> {
        na::Vector3::new(self.data[1], self.data[2], self.data[3])
    }

    pub fn norm(&self) -> f64 {
        self.data.norm()
    }

    pub fn normalize(&self) -> Self {
        let n = self.data.norm();
        if n < f64::EPSILON {
            return Self::identity();
        }
        Quaternion {
            data: self.data / n,
        }
    }

    pub fn conjugate(&self) -> Self {
        Quaternion::new(self.data[0], -self.data[1], -self.data[2], -self.data[3])
    }

    pub fn to_rotation_matrix(&self) -> na::Matrix3<f64> {
        let q0 = self.data[0];
        let q1 = self.data[1];
        let q2 = self.data[2];
        let q3 = self.data[3];

        na::Matrix3::new(
            1.0-2.0*(q2*q2+q3*q3), 2.0*(q1*q2-q0*q3),     2.0*(q1*q3+q0*q2),
            2.0*(q1*q2+q0*q3),     1.0-2.0*(q1*q1+q3*q3), 2.0*(q2*q3-q0*q1),
            2.0*(q1*q3-q0*q2),     2.0*(q2*q3+q0*q1),     1.0-2.0*(q1*q1+q2*q2)
        )
    }

    /// Body-frame vector expressed in the world frame.
    pub fn rotate(&self, v: &na::Vector3<f64>) -> na::Vector3<f64> {
        self.to_rotation_matrix() * v
    }

    /// World-frame vector expressed in the body frame.
    pub fn inverse_rotate(&self, v: &na::Vector3<f64>) -> na::Vector3<f64> {
        self.to_rotation_matrix().transpose() * v
    }

    pub fn multiply(&self, other: &Quaternion) -> Self {
        let (s1, v1) = (self.scalar(), self.vector());
        let (s2, v2) = (other.scalar(), other.vector());
        let v = v2 * s1 + v1 * s2 + v1.cross(&v2);

        Quaternion::new(s1 * s2 - v1.dot(&v2), v.x, v.y, v.z).normalize()
    }

    /// Smallest rotation angle (radians) taking `self` onto `other`.
    pub fn angle_to(&self, other: &Quaternion) -> f64 {
        let dot = self.data.dot(&other.data).abs().min(1.0);
        2.0 * dot.acos()
    }
}

pub fn compute_quaternion_derivative(q: &Quaternion, w: &na::Vector3<f64>) -> Quaternion {
    let wx = w[0];
    let wy = w[1];
    let wz = w[2];

    Quaternion::new(
        -0.5 * (q.data[1]*wx + q.data[2]*wy + q.data[3]*wz),
         0.5 * (q.data[0]*wx + q.data[2]*wz - q.data[3]*wy),
         0.5 * (q.data[0]*wy + q.data[3]*wx - q.data[1]*wz),
         0.5 * (q.data[0]*wz + q.data[1]*wy - q.data[2]*wx)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn rotate_about_z_maps_x_to_y() {
        let q = Quaternion::from_axis_angle(&na::Vector3::z(), PI / 2.0);
        let v = q.rotate(&na::Vector3::x());
        assert_relative_eq!(v, na::Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(q.inverse_rotate(&v), na::Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn angle_between_attitudes() {
        let a = Quaternion::identity();
        let b = Quaternion::from_axis_angle(&na::Vector3::new(1.0, 1.0, 0.0), 0.3);
        assert_relative_eq!(a.angle_to(&b), 0.3, epsilon = 1e-12);
        // q and -q describe the same attitude
        let neg = Quaternion { data: -b.data };
        assert_relative_eq!(b.angle_to(&neg), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn multiply_composes_rotations() {
        let qz = Quaternion::from_axis_angle(&na::Vector3::z(), PI / 2.0);
        let qx = Quaternion::from_axis_angle(&na::Vector3::x(), PI / 2.0);
        let composed = qz.multiply(&qx);
        let direct = qz.rotate(&qx.rotate(&na::Vector3::y()));
        assert_relative_eq!(composed.rotate(&na::Vector3::y()), direct, epsilon = 1e-12);
    }
}
