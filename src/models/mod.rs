pub mod spacecraft;
pub mod state;

pub use state::RigidBodyState;
