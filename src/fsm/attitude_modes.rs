use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttitudeMode {
    Thrusters,
    ReactionWheels,
    Cmgs,
}

impl AttitudeMode {
    /// Next mode in the toggle cycle, ignoring availability.
    pub fn successor(self) -> AttitudeMode {
        match self {
            AttitudeMode::Thrusters => AttitudeMode::ReactionWheels,
            AttitudeMode::ReactionWheels => AttitudeMode::Cmgs,
            AttitudeMode::Cmgs => AttitudeMode::Thrusters,
        }
    }
}

impl fmt::Display for AttitudeMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AttitudeMode::Thrusters => write!(f, "Thrusters"),
            AttitudeMode::ReactionWheels => write!(f, "Reaction Wheels"),
            AttitudeMode::Cmgs => write!(f, "CMGs"),
        }
    }
}
