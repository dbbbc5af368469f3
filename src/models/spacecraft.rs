use nalgebra as na;

pub trait MassProperties {
    fn mass(&self) -> f64;
    fn inertia(&self) -> na::Vector3<f64>;
}
