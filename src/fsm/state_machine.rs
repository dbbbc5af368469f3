use super::attitude_modes::AttitudeMode;
use log::info;

/// Which actuator arrays are populated on this vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub reaction_wheels: bool,
    pub cmgs: bool,
}

impl Availability {
    fn supports(&self, mode: AttitudeMode) -> bool {
        match mode {
            AttitudeMode::Thrusters => true,
            AttitudeMode::ReactionWheels => self.reaction_wheels,
            AttitudeMode::Cmgs => self.cmgs,
        }
    }
}

pub struct AttitudeModeFSM {
    current_state: AttitudeMode,
    availability: Availability,
    last_state_change: f64,
}

impl AttitudeModeFSM {
    pub fn new(availability: Availability) -> Self {
        Self {
            current_state: AttitudeMode::Thrusters,
            availability,
            last_state_change: 0.0,
        }
    }

    pub fn get_current_state(&self) -> AttitudeMode {
        self.current_state
    }

    fn transition_to(&mut self, new_state: AttitudeMode, time: f64) {
        if self.current_state != new_state {
            info!(
                "Attitude mode transition at t={:.2}s: {} -> {}",
                time, self.current_state, new_state
            );
            self.current_state = new_state;
            self.last_state_change = time;
        }
    }

    /// Advances to the next available mode. Thrusters are always available,
    /// so the cycle terminates.
    pub fn toggle(&mut self, time: f64) -> AttitudeMode {
        let mut next = self.current_state.successor();
        while !self.availability.supports(next) {
            next = next.successor();
        }
        self.transition_to(next, time);
        self.current_state
    }

    /// Actuator arrays changed (config rebuild). Falls back to thrusters if
    /// the current mode lost its hardware.
    pub fn set_availability(&mut self, availability: Availability, time: f64) {
        self.availability = availability;
        if !availability.supports(self.current_state) {
            self.transition_to(AttitudeMode::Thrusters, time);
        }
    }

    pub fn reset(&mut self, time: f64) {
        self.transition_to(AttitudeMode::Thrusters, time);
    }

    pub fn get_last_state_change(&self) -> f64 {
        self.last_state_change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn starts_in_thruster_mode() {
        let fsm = AttitudeModeFSM::new(Availability { reaction_wheels: true, cmgs: true });
        assert_eq!(fsm.get_current_state(), AttitudeMode::Thrusters);
    }

    #[test_case(true, true, &[AttitudeMode::ReactionWheels, AttitudeMode::Cmgs, AttitudeMode::Thrusters]; "full cycle")]
    #[test_case(true, false, &[AttitudeMode::ReactionWheels, AttitudeMode::Thrusters, AttitudeMode::ReactionWheels]; "no cmgs")]
    #[test_case(false, true, &[AttitudeMode::Cmgs, AttitudeMode::Thrusters, AttitudeMode::Cmgs]; "no wheels")]
    #[test_case(false, false, &[AttitudeMode::Thrusters, AttitudeMode::Thrusters, AttitudeMode::Thrusters]; "thrusters only")]
    fn toggle_cycles_through_available_modes(wheels: bool, cmgs: bool, expected: &[AttitudeMode]) {
        let mut fsm = AttitudeModeFSM::new(Availability { reaction_wheels: wheels, cmgs });
        let visited: Vec<AttitudeMode> = (0..3).map(|i| fsm.toggle(i as f64)).collect();
        assert_eq!(visited, expected);
    }

    #[test]
    fn losing_hardware_returns_to_thrusters() {
        let mut fsm = AttitudeModeFSM::new(Availability { reaction_wheels: true, cmgs: true });
        fsm.toggle(1.0);
        fsm.toggle(2.0);
        assert_eq!(fsm.get_current_state(), AttitudeMode::Cmgs);
        fsm.set_availability(Availability { reaction_wheels: true, cmgs: false }, 3.0);
        assert_eq!(fsm.get_current_state(), AttitudeMode::Thrusters);
        assert_eq!(fsm.get_last_state_change(), 3.0);
    }
}
