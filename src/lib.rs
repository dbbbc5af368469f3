pub mod config;
pub mod constants;
pub mod fsm;
pub mod gnc;
pub mod input;
pub mod integrators;
pub mod models;
pub mod numerics;
pub mod output;
pub mod physics;
pub mod sim;
