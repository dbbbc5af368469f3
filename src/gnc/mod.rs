pub mod actuators;
pub mod control;
pub mod propulsion;
