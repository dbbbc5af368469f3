pub mod attitude_modes;
pub mod docking;
pub mod state_machine;
