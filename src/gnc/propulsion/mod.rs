pub mod fuel;
pub mod thruster;
