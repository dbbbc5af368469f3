//! Canonical spacecraft configuration snapshot.
//!
//! JSON field names are camelCase. Thruster vectors are `[x, y, z]`
//! arrays, every other vector is an `{x, y, z}` object.

use super::errors::ConfigError;
use crate::constants::{DEFAULT_MAX_GIMBAL_RATE, DEFAULT_MAX_SUBSTEPS, DEFAULT_PHYSICS_DT};
use crate::input::keys::ControlKey;
use crate::models::spacecraft::MassProperties;
use log::warn;
use nalgebra as na;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub const CURRENT_SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3Config {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3Config {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_vector(self) -> na::Vector3<f64> {
        na::Vector3::new(self.x, self.y, self.z)
    }
}

impl From<na::Vector3<f64>> for Vec3Config {
    fn from(v: na::Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAxis {
    X,
    Y,
    Z,
}

impl ControlAxis {
    pub fn index(self) -> usize {
        match self {
            ControlAxis::X => 0,
            ControlAxis::Y => 1,
            ControlAxis::Z => 2,
        }
    }

    pub const ALL: [ControlAxis; 3] = [ControlAxis::X, ControlAxis::Y, ControlAxis::Z];
}

impl fmt::Display for ControlAxis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ControlAxis::X => write!(f, "x"),
            ControlAxis::Y => write!(f, "y"),
            ControlAxis::Z => write!(f, "z"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacecraftProperties {
    pub dry_mass: f64,
    pub fuel_mass: f64,
    pub max_fuel_mass: f64,
    pub inertia: Vec3Config,
}

impl MassProperties for SpacecraftProperties {
    fn mass(&self) -> f64 {
        self.dry_mass + self.fuel_mass
    }

    fn inertia(&self) -> na::Vector3<f64> {
        self.inertia.to_vector()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrusterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub position: [f64; 3],
    pub direction: [f64; 3],
    pub thrust: f64,
    pub isp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionWheelConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Vec3Config,
    pub orientation: Vec3Config,
    pub max_angular_momentum: f64,
    pub max_torque: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmgConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3Config>,
    pub gimbal_orientation: Vec3Config,
    pub wheel_orientation: Vec3Config,
    pub max_angular_momentum: f64,
    pub max_torque: f64,
    #[serde(default = "default_max_gimbal_rate")]
    pub max_gimbal_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controlled_axis: Option<ControlAxis>,
}

impl CmgConfig {
    /// Axis this CMG steers. Falls back to the `CMG-1/2/3` naming convention.
    pub fn resolved_axis(&self) -> Option<ControlAxis> {
        self.controlled_axis.or_else(|| match self.name.as_deref() {
            Some("CMG-1") => Some(ControlAxis::X),
            Some("CMG-2") => Some(ControlAxis::Y),
            Some("CMG-3") => Some(ControlAxis::Z),
            _ => None,
        })
    }
}

/// Schema version 1 CMG entry: momentum limits only.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyCmgConfig {
    #[serde(default)]
    name: Option<String>,
    max_angular_momentum: f64,
    max_torque: f64,
    #[serde(default = "default_max_gimbal_rate")]
    max_gimbal_rate: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CmgRecord {
    Full(CmgConfig),
    Legacy(LegacyCmgConfig),
}

/// Wheel/gimbal pairs whose precession torque lies along +x, +y, +z for a
/// negative gimbal rate.
fn legacy_cmg_geometry(index: usize) -> (Vec3Config, Vec3Config, Option<ControlAxis>) {
    match index {
        0 => (Vec3Config::new(0.0, 0.0, 1.0), Vec3Config::new(-1.0, 0.0, 0.0), Some(ControlAxis::X)),
        1 => (Vec3Config::new(1.0, 0.0, 0.0), Vec3Config::new(0.0, -1.0, 0.0), Some(ControlAxis::Y)),
        2 => (Vec3Config::new(0.0, 1.0, 0.0), Vec3Config::new(0.0, 0.0, -1.0), Some(ControlAxis::Z)),
        _ => (Vec3Config::new(0.0, 0.0, 1.0), Vec3Config::new(1.0, 0.0, 0.0), None),
    }
}

impl CmgRecord {
    fn upgrade(self, index: usize) -> CmgConfig {
        match self {
            CmgRecord::Full(cfg) => cfg,
            CmgRecord::Legacy(legacy) => {
                let (wheel, gimbal, axis) = legacy_cmg_geometry(index);
                warn!(
                    "CMG {} has no orientations, assigning default geometry (wheel {:?}, gimbal {:?})",
                    index + 1,
                    wheel,
                    gimbal
                );
                CmgConfig {
                    name: Some(legacy.name.unwrap_or_else(|| format!("CMG-{}", index + 1))),
                    position: None,
                    gimbal_orientation: gimbal,
                    wheel_orientation: wheel,
                    max_angular_momentum: legacy.max_angular_momentum,
                    max_torque: legacy.max_torque,
                    max_gimbal_rate: legacy.max_gimbal_rate,
                    controlled_axis: axis,
                }
            }
        }
    }
}

/// Rewrites a version 1 document's CMG entries into the current shape.
/// Entries that already carry orientations are kept as written.
fn upgrade_legacy_cmgs(doc: &mut Value) -> Result<(), ConfigError> {
    let Some(entries) = doc.get_mut("cmgs").and_then(Value::as_array_mut) else {
        return Ok(());
    };
    for (index, entry) in entries.iter_mut().enumerate() {
        let record: CmgRecord = serde_json::from_value(entry.take())?;
        *entry = serde_json::to_value(record.upgrade(index))?;
    }
    Ok(())
}

fn schema_version_of(doc: &Value) -> Result<u32, ConfigError> {
    match doc.get("schemaVersion") {
        None => Ok(default_schema_version()),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                ConfigError::InvalidValue(format!("schemaVersion must be an integer, got {}", v))
            }),
    }
}

fn default_max_gimbal_rate() -> f64 {
    DEFAULT_MAX_GIMBAL_RATE
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DockingConfig {
    pub box_half_width: f64,
    pub max_angle_deg: f64,
    pub max_transverse_speed: f64,
    pub max_approach_speed: f64,
    pub max_angular_speed_deg: f64,
    pub approach_axis: Vec3Config,
    pub auto_dock: bool,
}

impl Default for DockingConfig {
    fn default() -> Self {
        Self {
            box_half_width: 0.5,
            max_angle_deg: 5.0,
            max_transverse_speed: 0.05,
            max_approach_speed: 0.1,
            max_angular_speed_deg: 1.0,
            approach_axis: Vec3Config::new(1.0, 0.0, 0.0),
            auto_dock: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationSettings {
    pub physics_dt: f64,
    pub max_substeps: usize,
    pub initial_position: Vec3Config,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            physics_dt: DEFAULT_PHYSICS_DT,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            initial_position: Vec3Config::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacecraftConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub name: String,
    pub properties: SpacecraftProperties,
    #[serde(default)]
    pub thrusters: Vec<ThrusterConfig>,
    #[serde(default)]
    pub reaction_wheels: Vec<ReactionWheelConfig>,
    #[serde(default)]
    pub cmgs: Vec<CmgConfig>,
    #[serde(default)]
    pub docking: DockingConfig,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub key_bindings: BTreeMap<String, ControlKey>,
}

fn require(condition: bool, message: impl FnOnce() -> String) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(message()))
    }
}

fn is_direction(v: &Vec3Config) -> bool {
    let n = v.to_vector().norm();
    n.is_finite() && n > 1e-9
}

impl SpacecraftConfig {
    /// Parses and validates a document. Only version 1 documents may carry
    /// CMG entries without orientations; newer versions must use the full
    /// CMG schema.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut doc: Value = serde_json::from_str(json)?;
        let version = schema_version_of(&doc)?;
        if version > CURRENT_SCHEMA_VERSION || version == 0 {
            return Err(ConfigError::UnsupportedVersion(version));
        }
        if version == 1 {
            upgrade_legacy_cmgs(&mut doc)?;
        }
        let mut config: SpacecraftConfig = serde_json::from_value(doc)?;
        config.schema_version = CURRENT_SCHEMA_VERSION;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Structural checks. Thruster performance figures are not checked here:
    /// a bad thruster is a runtime fault that disables only that unit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.properties;
        require(p.dry_mass.is_finite() && p.dry_mass > 0.0, || {
            format!("dryMass must be positive, got {}", p.dry_mass)
        })?;
        require(p.max_fuel_mass.is_finite() && p.max_fuel_mass >= 0.0, || {
            format!("maxFuelMass must be non-negative, got {}", p.max_fuel_mass)
        })?;
        require(p.fuel_mass >= 0.0 && p.fuel_mass <= p.max_fuel_mass, || {
            format!(
                "fuelMass {} must lie within [0, {}]",
                p.fuel_mass, p.max_fuel_mass
            )
        })?;
        let inertia = p.inertia.to_vector();
        require(inertia.iter().all(|i| i.is_finite() && *i > 0.0), || {
            format!("inertia components must be positive, got {:?}", p.inertia)
        })?;

        for (i, wheel) in self.reaction_wheels.iter().enumerate() {
            require(is_direction(&wheel.orientation), || {
                format!("reaction wheel {} has a zero orientation", i)
            })?;
            require(wheel.max_angular_momentum > 0.0 && wheel.max_torque > 0.0, || {
                format!("reaction wheel {} needs positive momentum and torque limits", i)
            })?;
        }

        for (i, cmg) in self.cmgs.iter().enumerate() {
            require(
                is_direction(&cmg.wheel_orientation) && is_direction(&cmg.gimbal_orientation),
                || format!("CMG {} has a zero wheel or gimbal orientation", i),
            )?;
            require(cmg.max_angular_momentum > 0.0 && cmg.max_torque > 0.0, || {
                format!("CMG {} needs positive momentum and torque limits", i)
            })?;
            require(cmg.max_gimbal_rate > 0.0, || {
                format!("CMG {} needs a positive maxGimbalRate", i)
            })?;
        }

        let d = &self.docking;
        require(
            d.box_half_width > 0.0
                && d.max_angle_deg > 0.0
                && d.max_transverse_speed >= 0.0
                && d.max_approach_speed >= 0.0
                && d.max_angular_speed_deg >= 0.0,
            || "docking thresholds must be positive".to_string(),
        )?;
        require(is_direction(&d.approach_axis), || {
            "docking approachAxis must be non-zero".to_string()
        })?;

        let s = &self.simulation;
        require(s.physics_dt.is_finite() && s.physics_dt > 0.0, || {
            format!("physicsDt must be positive, got {}", s.physics_dt)
        })?;
        require(s.max_substeps > 0, || "maxSubsteps must be at least 1".to_string())?;

        Ok(())
    }
}
