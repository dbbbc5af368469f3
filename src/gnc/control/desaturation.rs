//! Momentum offload using the thruster bank as an external torque source.
//!
//! This is a coarse heuristic, not momentum-exact: wheel momentum is bled
//! by `alignment * 0.01` per aligned thruster per step regardless of the
//! impulse that thruster actually delivers, and CMG singularities are
//! escaped by stepping the gimbal angle directly.
//!
//! Wheel offload fires only while `|ΣH| > 0.1` but exits only once every
//! wheel is below `0.5`. Wheels whose momenta cancel in the sum (skewed or
//! redundant arrays) therefore keep the controller active without firing
//! until it is cancelled or the mode leaves reaction wheels.
//!
//! Thrusters already fired this step, e.g. for translation, are not fired
//! again and do not bleed the wheels.

use crate::constants::*;
use crate::gnc::actuators::cmg::CmgArray;
use crate::gnc::actuators::reaction_wheel::ReactionWheelArray;
use crate::gnc::propulsion::fuel::FuelState;
use crate::gnc::propulsion::thruster::ThrusterBank;
use crate::physics::rigid_body::RigidBody;
use log::info;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesaturationReport {
    pub active: bool,
    pub fired: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Desaturation {
    active: bool,
}

impl Desaturation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn toggle(&mut self, time: f64) {
        self.active = !self.active;
        info!(
            "Desaturation {} at t={:.2}s",
            if self.active { "started" } else { "cancelled" },
            time
        );
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn step_wheels(
        &mut self,
        wheels: &mut ReactionWheelArray,
        thrusters: &mut ThrusterBank,
        body: &mut RigidBody,
        fuel: &mut FuelState,
        dt: f64,
    ) -> DesaturationReport {
        let mut fired = Vec::new();
        if !self.active {
            return DesaturationReport { active: false, fired };
        }

        let stored = wheels.total_momentum();
        if stored.norm() > DESAT_MOMENTUM_THRESHOLD {
            let desired = -stored.normalize();
            for index in 0..thrusters.len() {
                let alignment = match thrusters.get(index).and_then(|t| t.torque_direction()) {
                    Some(dir) => dir.dot(&desired),
                    None => continue,
                };
                if alignment <= DESAT_ALIGNMENT_THRESHOLD {
                    continue;
                }
                if thrusters.fire(index, DESAT_WHEEL_THRUST_FRACTION, body, fuel, dt) {
                    fired.push(index);
                    for wheel in wheels.wheels_mut() {
                        wheel.bleed(alignment * DESAT_WHEEL_REDUCTION_GAIN);
                    }
                }
            }
        }

        if wheels.max_abs_momentum() < DESAT_WHEEL_EXIT_MOMENTUM {
            info!("Reaction wheel desaturation complete");
            self.active = false;
        }
        DesaturationReport {
            active: self.active,
            fired,
        }
    }

    pub fn step_cmgs(
        &mut self,
        cmgs: &mut CmgArray,
        thrusters: &mut ThrusterBank,
        body: &mut RigidBody,
        fuel: &mut FuelState,
        dt: f64,
    ) -> DesaturationReport {
        let mut fired = Vec::new();
        if !self.active {
            return DesaturationReport { active: false, fired };
        }

        let singular = cmgs.singular_indices();
        if !singular.is_empty() {
            for index in (0..thrusters.len()).step_by(DESAT_CMG_THRUSTER_STRIDE) {
                if thrusters.fire(index, DESAT_CMG_THRUST_FRACTION, body, fuel, dt) {
                    fired.push(index);
                }
            }
            for index in singular {
                cmgs.nudge_gimbal(index, DESAT_GIMBAL_NUDGE);
            }
        }

        if !cmgs.any_near_singular() {
            info!("CMG desaturation complete");
            self.active = false;
        }
        DesaturationReport {
            active: self.active,
            fired,
        }
    }
}
