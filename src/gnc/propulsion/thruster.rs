use super::fuel::FuelState;
use crate::config::spacecraft::ThrusterConfig;
use crate::constants::G0;
use crate::physics::rigid_body::RigidBody;
use log::{debug, warn};
use nalgebra as na;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Thruster {
    pub name: String,
    pub position: na::Vector3<f64>,  // body frame (m)
    pub direction: na::Vector3<f64>, // body frame, unit
    pub thrust: f64,                 // N
    pub specific_impulse: f64,       // s
    pub active: bool,
}

impl Thruster {
    pub fn from_config(index: usize, config: &ThrusterConfig) -> Self {
        let direction = na::Vector3::from(config.direction);
        Self {
            name: config
                .name
                .clone()
                .unwrap_or_else(|| format!("thruster-{}", index)),
            position: na::Vector3::from(config.position),
            direction: direction.try_normalize(1e-9).unwrap_or_else(na::Vector3::zeros),
            thrust: config.thrust,
            specific_impulse: config.isp,
            active: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.thrust.is_finite()
            && self.thrust > 0.0
            && self.specific_impulse.is_finite()
            && self.specific_impulse > 0.0
            && self.direction.norm() > 0.5
    }

    /// Body-frame force at full thrust.
    pub fn force(&self) -> na::Vector3<f64> {
        self.direction * self.thrust
    }

    /// Propellant mass flow at full thrust (kg/s).
    pub fn mass_flow_rate(&self) -> f64 {
        self.thrust / (self.specific_impulse * G0)
    }

    /// Unit direction of the torque this thruster produces about the centre of mass.
    pub fn torque_direction(&self) -> Option<na::Vector3<f64>> {
        self.position.cross(&self.direction).try_normalize(1e-9)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThrusterTransition {
    pub index: usize,
    pub active: bool,
}

/// Fixed set of on/off thrusters. A step is bracketed by `begin_step` and
/// `end_step`; every `fire` in between may switch a unit on. A unit fires
/// at most once per step, so overlapping requests never stack thrust.
#[derive(Debug, Clone, Default)]
pub struct ThrusterBank {
    thrusters: Vec<Thruster>,
    previous: Vec<bool>,
    fired: Vec<bool>,
}

impl ThrusterBank {
    pub fn from_config(configs: &[ThrusterConfig]) -> Self {
        let thrusters: Vec<Thruster> = configs
            .iter()
            .enumerate()
            .map(|(i, c)| Thruster::from_config(i, c))
            .collect();
        for t in thrusters.iter().filter(|t| !t.is_valid()) {
            warn!(
                "Thruster '{}' has invalid parameters (thrust={}, isp={}) and will never fire",
                t.name, t.thrust, t.specific_impulse
            );
        }
        let previous = vec![false; thrusters.len()];
        let fired = vec![false; thrusters.len()];
        Self {
            thrusters,
            previous,
            fired,
        }
    }

    pub fn len(&self) -> usize {
        self.thrusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thrusters.is_empty()
    }

    pub fn thrusters(&self) -> &[Thruster] {
        &self.thrusters
    }

    pub fn get(&self, index: usize) -> Option<&Thruster> {
        self.thrusters.get(index)
    }

    pub fn active_flags(&self) -> Vec<bool> {
        self.thrusters.iter().map(|t| t.active).collect()
    }

    pub fn begin_step(&mut self) {
        for (prev, t) in self.previous.iter_mut().zip(self.thrusters.iter_mut()) {
            *prev = t.active;
            t.active = false;
        }
        self.fired.iter_mut().for_each(|f| *f = false);
    }

    /// Whether the unit already fired since `begin_step`.
    pub fn fired_this_step(&self, index: usize) -> bool {
        self.fired.get(index).copied().unwrap_or(false)
    }

    /// Fires one thruster at `throttle` of nominal thrust for `dt` seconds.
    /// Returns whether any force was applied. A unit that already fired this
    /// step is refused. The unit is left inactive when its burn empties the
    /// tank.
    pub fn fire(
        &mut self,
        index: usize,
        throttle: f64,
        body: &mut RigidBody,
        fuel: &mut FuelState,
        dt: f64,
    ) -> bool {
        if self.fired_this_step(index) {
            return false;
        }
        let Some(thruster) = self.thrusters.get_mut(index) else {
            return false;
        };
        if !thruster.is_valid() {
            warn!(
                "Thruster '{}' fault: thrust={} isp={}, forced inactive",
                thruster.name, thruster.thrust, thruster.specific_impulse
            );
            return false;
        }
        if fuel.is_empty() {
            return false;
        }

        body.apply_local_force(&(thruster.force() * throttle), &thruster.position);
        fuel.consume(thruster.mass_flow_rate() * throttle * dt);
        self.fired[index] = true;

        thruster.active = !fuel.is_empty();
        if fuel.is_empty() {
            debug!("Fuel exhausted while firing '{}'", thruster.name);
        }
        true
    }

    /// Fires every listed thruster at full thrust. Returns the indices that
    /// actually produced force.
    pub fn fire_all(
        &mut self,
        indices: &[usize],
        body: &mut RigidBody,
        fuel: &mut FuelState,
        dt: f64,
    ) -> Vec<usize> {
        indices
            .iter()
            .copied()
            .filter(|&i| self.fire(i, 1.0, body, fuel, dt))
            .collect()
    }

    /// Activation changes since `begin_step`.
    pub fn end_step(&mut self) -> Vec<ThrusterTransition> {
        self.thrusters
            .iter()
            .zip(self.previous.iter())
            .enumerate()
            .filter(|(_, (t, prev))| t.active != **prev)
            .map(|(index, (t, _))| ThrusterTransition {
                index,
                active: t.active,
            })
            .collect()
    }

    pub fn deactivate_all(&mut self) {
        for t in &mut self.thrusters {
            t.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RigidBodyState;
    use crate::numerics::quaternion::Quaternion;
    use approx::assert_relative_eq;

    fn config(thrust: f64, isp: f64) -> ThrusterConfig {
        ThrusterConfig {
            name: None,
            position: [0.0, 0.0, -1.0],
            direction: [0.0, 0.0, 1.0],
            thrust,
            isp,
        }
    }

    fn body() -> RigidBody {
        let mut state = RigidBodyState::zero();
        state.mass = 100.0;
        state.inertia = na::Vector3::new(10.0, 10.0, 10.0);
        state.quaternion = Quaternion::identity();
        RigidBody::new(state)
    }

    #[test]
    fn one_second_burn_consumes_expected_propellant() {
        let mut bank = ThrusterBank::from_config(&[config(50.0, 300.0)]);
        let mut fuel = FuelState::new(100.0, 10.0, 10.0);
        let mut body = body();

        bank.begin_step();
        assert!(bank.fire(0, 1.0, &mut body, &mut fuel, 1.0));
        let consumed = 10.0 - fuel.fuel_mass();
        assert_relative_eq!(consumed, 50.0 / (300.0 * 9.80665), epsilon = 1e-12);
        assert_relative_eq!(consumed, 0.01699, epsilon = 1e-5);
        assert_eq!(bank.end_step(), vec![ThrusterTransition { index: 0, active: true }]);
    }

    #[test]
    fn invalid_thruster_never_fires() {
        let mut bank = ThrusterBank::from_config(&[config(f64::NAN, 300.0), config(10.0, 0.0)]);
        let mut fuel = FuelState::new(100.0, 10.0, 10.0);
        let mut body = body();

        bank.begin_step();
        assert_eq!(bank.fire_all(&[0, 1], &mut body, &mut fuel, 1.0).len(), 0);
        assert!(bank.end_step().is_empty());
        assert_eq!(fuel.fuel_mass(), 10.0);
        assert_eq!(body.pending_force(), na::Vector3::zeros());
    }

    #[test]
    fn empty_tank_cuts_thrust() {
        let mut bank = ThrusterBank::from_config(&[config(50.0, 300.0), config(50.0, 300.0)]);
        let mut fuel = FuelState::new(100.0, 0.01, 10.0);
        let mut body = body();

        bank.begin_step();
        // First burn drains the tank, the second unit gets nothing
        assert_eq!(bank.fire_all(&[0, 1], &mut body, &mut fuel, 1.0).len(), 1);
        assert!(fuel.is_empty());
        assert_eq!(bank.active_flags(), vec![false, false]);
        assert_relative_eq!(body.pending_force().z, 50.0);

        body.clear_accumulators();
        bank.begin_step();
        assert_eq!(bank.fire_all(&[0, 1], &mut body, &mut fuel, 1.0).len(), 0);
        assert_eq!(body.pending_force(), na::Vector3::zeros());
    }

    #[test]
    fn unit_fires_once_per_step() {
        let mut bank = ThrusterBank::from_config(&[config(50.0, 300.0)]);
        let mut fuel = FuelState::new(100.0, 10.0, 10.0);
        let mut body = body();

        bank.begin_step();
        assert!(bank.fire(0, 1.0, &mut body, &mut fuel, 1.0));
        assert!(bank.fired_this_step(0));
        let after_first = fuel.fuel_mass();
        assert!(!bank.fire(0, 0.5, &mut body, &mut fuel, 1.0));
        assert_eq!(fuel.fuel_mass(), after_first);
        assert_relative_eq!(body.pending_force().z, 50.0);

        // Re-armed by the next step
        body.clear_accumulators();
        bank.begin_step();
        assert!(!bank.fired_this_step(0));
        assert!(bank.fire(0, 1.0, &mut body, &mut fuel, 1.0));
    }

    #[test]
    fn release_reports_transition() {
        let mut bank = ThrusterBank::from_config(&[config(50.0, 300.0)]);
        let mut fuel = FuelState::new(100.0, 10.0, 10.0);
        let mut body = body();

        bank.begin_step();
        bank.fire(0, 1.0, &mut body, &mut fuel, 0.1);
        bank.end_step();
        bank.begin_step();
        assert_eq!(bank.end_step(), vec![ThrusterTransition { index: 0, active: false }]);
    }

    #[test]
    fn torque_direction_of_offset_thruster() {
        let t = Thruster::from_config(
            0,
            &ThrusterConfig {
                name: None,
                position: [-1.0, 0.5, 0.0],
                direction: [2.0, 0.0, 0.0],
                thrust: 1.0,
                isp: 1.0,
            },
        );
        assert_relative_eq!(t.direction, na::Vector3::x());
        assert_relative_eq!(t.torque_direction().unwrap(), -na::Vector3::z());
    }
}
