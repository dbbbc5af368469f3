use crate::constants::THRUSTER_ALIGNMENT_THRESHOLD;
use crate::gnc::propulsion::thruster::ThrusterBank;
use nalgebra as na;

/// Thrusters whose force direction lies along the translation demand.
pub fn thrusters_for_translation(bank: &ThrusterBank, demand: &na::Vector3<f64>) -> Vec<usize> {
    let Some(want) = demand.try_normalize(1e-9) else {
        return Vec::new();
    };
    bank.thrusters()
        .iter()
        .enumerate()
        .filter(|(_, t)| t.direction.dot(&want) > THRUSTER_ALIGNMENT_THRESHOLD)
        .map(|(i, _)| i)
        .collect()
}

/// Thrusters whose torque about the centre of mass lies along the rotation demand.
pub fn thrusters_for_rotation(bank: &ThrusterBank, demand: &na::Vector3<f64>) -> Vec<usize> {
    let Some(want) = demand.try_normalize(1e-9) else {
        return Vec::new();
    };
    bank.thrusters()
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            t.torque_direction()
                .map_or(false, |dir| dir.dot(&want) > THRUSTER_ALIGNMENT_THRESHOLD)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Body torque command for the momentum actuators, scaled by their rated torque.
pub fn torque_command(rotation: &na::Vector3<f64>, authority: f64) -> na::Vector3<f64> {
    rotation * authority
}
