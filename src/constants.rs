pub const G0: f64 = 9.80665; // Standard gravity used for specific impulse (m/s²)

// Time base
pub const DEFAULT_PHYSICS_DT: f64 = 1.0 / 60.0; // Fixed physics step (s)
pub const DEFAULT_MAX_SUBSTEPS: usize = 5;

// Momentum storage actuators
pub const MIN_CONTROL_MOMENTUM: f64 = 0.1; // Below this a CMG has no authority (N⋅m⋅s)
pub const CMG_INITIAL_MOMENTUM_FRACTION: f64 = 0.8;
pub const CMG_SINGULARITY_SIN: f64 = 0.95;
pub const DEFAULT_MAX_GIMBAL_RATE: f64 = 1.0; // rad/s

// Desaturation heuristics
pub const DESAT_MOMENTUM_THRESHOLD: f64 = 0.1;
pub const DESAT_ALIGNMENT_THRESHOLD: f64 = 0.5;
pub const DESAT_WHEEL_THRUST_FRACTION: f64 = 0.5;
pub const DESAT_WHEEL_REDUCTION_GAIN: f64 = 0.01;
pub const DESAT_WHEEL_EXIT_MOMENTUM: f64 = 0.5;
pub const DESAT_CMG_THRUST_FRACTION: f64 = 0.2;
pub const DESAT_CMG_THRUSTER_STRIDE: usize = 3;
pub const DESAT_GIMBAL_NUDGE: f64 = 0.1; // rad per step

// Thruster allocation
pub const THRUSTER_ALIGNMENT_THRESHOLD: f64 = 0.7;
