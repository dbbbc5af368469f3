use super::spacecraft::*;
use lazy_static::lazy_static;
use std::collections::BTreeMap;

const RCS_THRUST: f64 = 50.0; // N
const RCS_ISP: f64 = 300.0; // s
const RCS_ARM: f64 = 0.5; // m, lateral offset of each thruster in a pair
const RCS_STATION: f64 = 1.0; // m, distance of the pair from the centre of mass

/// Two thrusters pushing along `sign * axis`, mounted behind the centre of
/// mass and offset either side along `offset_axis`. Fired together they
/// translate; fired singly they rotate.
fn rcs_pair(label: &str, axis: usize, sign: f64, offset_axis: usize) -> [ThrusterConfig; 2] {
    let make = |side: f64, suffix: &str| {
        let mut position = [0.0; 3];
        position[axis] = -sign * RCS_STATION;
        position[offset_axis] = side * RCS_ARM;
        let mut direction = [0.0; 3];
        direction[axis] = sign;
        ThrusterConfig {
            name: Some(format!("{}{}", label, suffix)),
            position,
            direction,
            thrust: RCS_THRUST,
            isp: RCS_ISP,
        }
    };
    [make(1.0, "a"), make(-1.0, "b")]
}

fn default_thrusters() -> Vec<ThrusterConfig> {
    [
        rcs_pair("+X", 0, 1.0, 1),
        rcs_pair("-X", 0, -1.0, 1),
        rcs_pair("+Y", 1, 1.0, 2),
        rcs_pair("-Y", 1, -1.0, 2),
        rcs_pair("+Z", 2, 1.0, 0),
        rcs_pair("-Z", 2, -1.0, 0),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn default_wheels() -> Vec<ReactionWheelConfig> {
    ControlAxis::ALL
        .iter()
        .map(|axis| {
            let mut orientation = [0.0; 3];
            orientation[axis.index()] = 1.0;
            ReactionWheelConfig {
                name: Some(format!("RW-{}", axis)),
                position: Vec3Config::default(),
                orientation: Vec3Config::new(orientation[0], orientation[1], orientation[2]),
                max_angular_momentum: 15.0,
                max_torque: 0.5,
            }
        })
        .collect()
}

fn default_cmgs() -> Vec<CmgConfig> {
    let cmg = |name: &str, wheel: Vec3Config, gimbal: Vec3Config, axis: Option<ControlAxis>| {
        CmgConfig {
            name: Some(name.to_string()),
            position: None,
            gimbal_orientation: gimbal,
            wheel_orientation: wheel,
            max_angular_momentum: 20.0,
            max_torque: 1.0,
            max_gimbal_rate: 1.0,
            controlled_axis: axis,
        }
    };
    vec![
        cmg("CMG-1", Vec3Config::new(0.0, 0.0, 1.0), Vec3Config::new(-1.0, 0.0, 0.0), Some(ControlAxis::X)),
        cmg("CMG-2", Vec3Config::new(1.0, 0.0, 0.0), Vec3Config::new(0.0, -1.0, 0.0), Some(ControlAxis::Y)),
        cmg("CMG-3", Vec3Config::new(0.0, 1.0, 0.0), Vec3Config::new(0.0, 0.0, -1.0), Some(ControlAxis::Z)),
        cmg("CMG-4", Vec3Config::new(0.0, 0.0, 1.0), Vec3Config::new(1.0, 0.0, 0.0), None),
    ]
}

lazy_static! {
    /// Built-in vehicle used whenever no configuration can be loaded.
    pub static ref DEFAULT_SPACECRAFT: SpacecraftConfig = SpacecraftConfig {
        schema_version: CURRENT_SCHEMA_VERSION,
        name: "Default RCS Demonstrator".to_string(),
        properties: SpacecraftProperties {
            dry_mass: 500.0,
            fuel_mass: 100.0,
            max_fuel_mass: 100.0,
            inertia: Vec3Config::new(400.0, 400.0, 300.0),
        },
        thrusters: default_thrusters(),
        reaction_wheels: default_wheels(),
        cmgs: default_cmgs(),
        docking: DockingConfig::default(),
        simulation: SimulationSettings::default(),
        key_bindings: BTreeMap::new(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra as na;

    #[test]
    fn default_spacecraft_is_valid() {
        assert!(DEFAULT_SPACECRAFT.validate().is_ok());
        assert_eq!(DEFAULT_SPACECRAFT.thrusters.len(), 12);
    }

    #[test]
    fn thruster_pairs_cancel_torque() {
        for pair in DEFAULT_SPACECRAFT.thrusters.chunks(2) {
            let torque: na::Vector3<f64> = pair
                .iter()
                .map(|t| {
                    let r = na::Vector3::from(t.position);
                    let f = na::Vector3::from(t.direction) * t.thrust;
                    r.cross(&f)
                })
                .sum();
            assert!(torque.norm() < 1e-12);
        }
    }
}
