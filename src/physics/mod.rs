pub mod attitude;
pub mod dynamics;
pub mod rigid_body;
