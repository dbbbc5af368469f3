use super::telemetry::Telemetry;
use crate::config::spacecraft::SpacecraftConfig;
use crate::fsm::attitude_modes::AttitudeMode;
use crate::fsm::docking::DockingQualifier;
use crate::fsm::state_machine::{AttitudeModeFSM, Availability};
use crate::gnc::actuators::cmg::CmgArray;
use crate::gnc::actuators::reaction_wheel::ReactionWheelArray;
use crate::gnc::control::allocation::{thrusters_for_rotation, thrusters_for_translation, torque_command};
use crate::gnc::control::desaturation::{Desaturation, DesaturationReport};
use crate::gnc::propulsion::fuel::FuelState;
use crate::gnc::propulsion::thruster::{ThrusterBank, ThrusterTransition};
use crate::input::bindings::KeyBindings;
use crate::input::keys::{Command, ControlKey};
use crate::input::state::InputState;
use crate::models::spacecraft::MassProperties;
use crate::models::RigidBodyState;
use crate::numerics::quaternion::Quaternion;
use crate::physics::rigid_body::RigidBody;
use hifitime::{Duration, Epoch};
use log::{debug, info};
use nalgebra as na;

// Tolerance on the step accumulator so frame deltas equal to the physics
// step are not lost to rounding
const ACCUMULATOR_EPSILON: f64 = 1e-9;

/// What happened during the last fixed step.
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    pub commanded_torque: na::Vector3<f64>,
    pub attitude_torque: na::Vector3<f64>,
    pub fired: Vec<usize>,
    pub transitions: Vec<ThrusterTransition>,
    pub desaturation: Option<DesaturationReport>,
    pub docked: bool,
}

/// Everything a running scenario owns. Created at scenario start, mutated
/// once per fixed step, dropped at teardown.
pub struct Simulation {
    config: SpacecraftConfig,
    bindings: KeyBindings,
    body: RigidBody,
    thrusters: ThrusterBank,
    fuel: FuelState,
    wheels: ReactionWheelArray,
    cmgs: CmgArray,
    mode: AttitudeModeFSM,
    desaturation: Desaturation,
    docking: DockingQualifier,
    input: InputState,
    start_epoch: Epoch,
    elapsed: f64,
    accumulator: f64,
    paused: bool,
    status_message: Option<String>,
    last_report: StepReport,
}

fn availability(wheels: &ReactionWheelArray, cmgs: &CmgArray) -> Availability {
    Availability {
        reaction_wheels: !wheels.is_empty(),
        cmgs: !cmgs.is_empty(),
    }
}

impl Simulation {
    pub fn new(config: SpacecraftConfig, start_epoch: Epoch) -> Self {
        let initial_position = config.simulation.initial_position.to_vector();
        let initial_orientation = Quaternion::identity();
        let body = RigidBody::new(RigidBodyState::new(
            &config.properties,
            initial_position,
            initial_orientation,
        ));
        let wheels = ReactionWheelArray::from_config(&config.reaction_wheels);
        let cmgs = CmgArray::from_config(&config.cmgs);

        Self {
            bindings: KeyBindings::with_overrides(&config.key_bindings),
            thrusters: ThrusterBank::from_config(&config.thrusters),
            fuel: FuelState::from_properties(&config.properties),
            mode: AttitudeModeFSM::new(availability(&wheels, &cmgs)),
            desaturation: Desaturation::new(),
            docking: DockingQualifier::new(
                config.docking.clone(),
                initial_position,
                initial_orientation,
            ),
            input: InputState::new(),
            wheels,
            cmgs,
            body,
            config,
            start_epoch,
            elapsed: 0.0,
            accumulator: 0.0,
            paused: false,
            status_message: None,
            last_report: StepReport::default(),
        }
    }

    /// Message shown to the operator, e.g. a configuration fallback notice.
    pub fn with_status(mut self, status: Option<String>) -> Self {
        self.status_message = status;
        self
    }

    pub fn config(&self) -> &SpacecraftConfig {
        &self.config
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut RigidBody {
        &mut self.body
    }

    pub fn fuel(&self) -> &FuelState {
        &self.fuel
    }

    pub fn thrusters(&self) -> &ThrusterBank {
        &self.thrusters
    }

    pub fn wheels(&self) -> &ReactionWheelArray {
        &self.wheels
    }

    pub fn wheels_mut(&mut self) -> &mut ReactionWheelArray {
        &mut self.wheels
    }

    pub fn cmgs(&self) -> &CmgArray {
        &self.cmgs
    }

    pub fn cmgs_mut(&mut self) -> &mut CmgArray {
        &mut self.cmgs
    }

    pub fn mode(&self) -> AttitudeMode {
        self.mode.get_current_state()
    }

    pub fn docking(&self) -> &DockingQualifier {
        &self.docking
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn is_desaturating(&self) -> bool {
        self.desaturation.is_active()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn epoch(&self) -> Epoch {
        self.start_epoch + Duration::from_seconds(self.elapsed)
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn last_report(&self) -> &StepReport {
        &self.last_report
    }

    pub fn physics_dt(&self) -> f64 {
        self.config.simulation.physics_dt
    }

    /// Key event by name through the configured bindings. Unknown names are ignored.
    pub fn key_event(&mut self, name: &str, pressed: bool) -> Option<ControlKey> {
        let key = self.bindings.resolve(name)?;
        if pressed {
            self.input.key_down(key);
        } else {
            self.input.key_up(key);
        }
        Some(key)
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry::capture(self)
    }

    /// Feeds a render-frame delta and runs as many whole fixed steps as it
    /// covers, up to `maxSubsteps`. Returns the number of steps run.
    pub fn advance(&mut self, frame_dt: f64) -> usize {
        let dt = self.physics_dt();
        self.accumulator += frame_dt.max(0.0);

        let mut steps = 0;
        while self.accumulator + ACCUMULATOR_EPSILON >= dt {
            if steps == self.config.simulation.max_substeps {
                debug!(
                    "Frame behind by {:.4}s, dropping accumulated time",
                    self.accumulator
                );
                self.accumulator = 0.0;
                break;
            }
            self.step();
            self.accumulator -= dt;
            steps += 1;
        }
        self.accumulator = self.accumulator.max(0.0);
        steps
    }

    /// Runs exactly one fixed physics step.
    pub fn step(&mut self) -> &StepReport {
        let dt = self.physics_dt();
        let frame = self.input.take_frame();
        let mut report = StepReport::default();

        for command in frame.commands {
            self.handle_command(command);
        }

        if self.paused {
            self.thrusters.deactivate_all();
            report.docked = self.docking.is_docked();
            self.last_report = report;
            return &self.last_report;
        }

        let mode = self.mode.get_current_state();
        self.thrusters.begin_step();

        // Translation has no wheel or CMG equivalent, so it always uses thrusters
        let mut selected = thrusters_for_translation(&self.thrusters, &frame.translation);
        report.commanded_torque = match mode {
            AttitudeMode::Thrusters => {
                selected.extend(thrusters_for_rotation(&self.thrusters, &frame.rotation));
                na::Vector3::zeros()
            }
            AttitudeMode::ReactionWheels => torque_command(&frame.rotation, self.wheels.authority()),
            AttitudeMode::Cmgs => torque_command(&frame.rotation, self.cmgs.authority()),
        };
        selected.sort_unstable();
        selected.dedup();

        report.fired = self
            .thrusters
            .fire_all(&selected, &mut self.body, &mut self.fuel, dt);

        report.attitude_torque = match mode {
            AttitudeMode::Thrusters => na::Vector3::zeros(),
            AttitudeMode::ReactionWheels => {
                self.wheels.apply(&report.commanded_torque, &mut self.body, dt)
            }
            AttitudeMode::Cmgs => self.cmgs.apply(&report.commanded_torque, &mut self.body, dt),
        };

        if self.desaturation.is_active() {
            report.desaturation = Some(match mode {
                AttitudeMode::ReactionWheels => self.desaturation.step_wheels(
                    &mut self.wheels,
                    &mut self.thrusters,
                    &mut self.body,
                    &mut self.fuel,
                    dt,
                ),
                AttitudeMode::Cmgs => self.desaturation.step_cmgs(
                    &mut self.cmgs,
                    &mut self.thrusters,
                    &mut self.body,
                    &mut self.fuel,
                    dt,
                ),
                AttitudeMode::Thrusters => {
                    self.desaturation.stop();
                    DesaturationReport { active: false, fired: Vec::new() }
                }
            });
        }

        report.transitions = self.thrusters.end_step();

        self.body.set_mass(self.fuel.total_mass());
        self.body.step(dt);
        self.elapsed += dt;

        if self.docking.evaluate(self.body.state(), self.elapsed) {
            self.enter_docked();
            report.docked = true;
        }

        self.last_report = report;
        &self.last_report
    }

    fn handle_command(&mut self, command: Command) {
        let time = self.elapsed;
        match command {
            Command::ToggleMode => {
                if self.mode.toggle(time) == AttitudeMode::Thrusters && self.desaturation.is_active() {
                    self.desaturation.stop();
                }
            }
            Command::Desaturate => {
                if self.mode.get_current_state() == AttitudeMode::Thrusters {
                    info!("Desaturation unavailable in thruster mode");
                } else {
                    self.desaturation.toggle(time);
                }
            }
            Command::Reset => self.reset(),
            Command::Dock => {
                if self.docking.dock(time) {
                    self.enter_docked();
                }
            }
            Command::Undock => {
                if self.docking.undock(time) {
                    self.paused = false;
                }
            }
            Command::StopAll => self.stop_all(),
        }
    }

    fn enter_docked(&mut self) {
        self.body.zero_velocities();
        self.body.clear_accumulators();
        self.thrusters.deactivate_all();
        self.desaturation.stop();
        self.paused = true;
    }

    /// Zeroes velocities and cuts every thruster. Actuator momentum is kept.
    pub fn stop_all(&mut self) {
        info!("Stop commanded at t={:.2}s", self.elapsed);
        self.body.zero_velocities();
        self.body.clear_accumulators();
        self.thrusters.deactivate_all();
    }

    /// Returns the vehicle to the scenario start: pose, velocities, fuel,
    /// wheel momentum, gimbal angles, attitude mode and docking session.
    pub fn reset(&mut self) {
        info!("Simulation reset at t={:.2}s", self.elapsed);
        let (position, orientation) = self.docking.reference();
        self.body.reset_to(position, orientation);
        self.fuel.reset();
        self.body.set_mass(self.fuel.total_mass());
        self.wheels.reset();
        self.cmgs.reset();
        self.mode.reset(self.elapsed);
        self.desaturation.stop();
        self.docking.reset();
        self.thrusters.deactivate_all();
        self.accumulator = 0.0;
        self.paused = false;
    }

    /// Swaps in a new configuration snapshot and rebuilds the actuator
    /// arrays from it. Pose, velocities, the docking reference and the
    /// docking session (including a docked latch) are kept.
    pub fn rebuild(&mut self, config: SpacecraftConfig) {
        info!(
            "Rebuilding vehicle from configuration '{}' at t={:.2}s",
            config.name, self.elapsed
        );
        self.thrusters = ThrusterBank::from_config(&config.thrusters);
        self.wheels = ReactionWheelArray::from_config(&config.reaction_wheels);
        self.cmgs = CmgArray::from_config(&config.cmgs);
        self.fuel = FuelState::from_properties(&config.properties);
        self.body.set_mass(config.properties.mass());
        self.body.set_inertia(config.properties.inertia());
        self.mode
            .set_availability(availability(&self.wheels, &self.cmgs), self.elapsed);
        self.desaturation.stop();
        self.docking.set_limits(config.docking.clone());
        self.bindings = KeyBindings::with_overrides(&config.key_bindings);
        self.config = config;
    }
}
