//! Robot facade: owns the calibration, binding table and state buffers and
//! sequences the per-cycle steps.
//!
//! The operation groups live beside the layer they drive:
//! [`crate::safety`] (validity, interlock, power), [`crate::command`] and
//! [`crate::calibrate`].

use rio_common::config::RioConfig;
use rio_common::robot::board::AxisBinding;
use rio_common::robot::config::{JointType, RobotConfig};
use rio_common::robot::error::RobotError;
use tracing::{debug, info};

use crate::binding::BoardBinding;
use crate::calibration::Calibration;
use crate::convert::convert_state;
use crate::state::{CommandState, ConvertedState, RawState, SafetyState};

/// One robot driven by a set of amplifier boards.
#[derive(Debug)]
pub struct Robot {
    pub(crate) config: RobotConfig,
    pub(crate) calibration: Calibration,
    pub(crate) binding: Option<BoardBinding>,
    pub(crate) raw: RawState,
    pub(crate) converted: ConvertedState,
    pub(crate) safety: SafetyState,
    pub(crate) command: CommandState,
}

impl Robot {
    /// Build a robot from its description. Boards must be bound with
    /// [`Robot::bind`] before any cycle step.
    ///
    /// # Errors
    /// [`RobotError::Configuration`] if the description is inconsistent.
    pub fn new(config: RobotConfig, max_consecutive_current_violations: usize) -> Result<Self, RobotError> {
        let calibration = Calibration::from_config(&config)?;
        let (actuators, joints, brakes) = (
            calibration.number_of_actuators(),
            calibration.number_of_joints(),
            calibration.number_of_brakes(),
        );
        info!(
            robot = %config.name,
            actuators,
            joints,
            brakes,
            pot_location = ?config.pot_location,
            max_consecutive_current_violations,
            "robot configured"
        );
        Ok(Self {
            config,
            calibration,
            binding: None,
            raw: RawState::new(actuators, brakes),
            converted: ConvertedState::new(actuators, joints, brakes),
            safety: SafetyState::new(max_consecutive_current_violations),
            command: CommandState::new(actuators, brakes),
        })
    }

    /// Build from a loaded configuration file.
    pub fn from_config(config: &RioConfig) -> Result<Self, RobotError> {
        Self::new(
            config.robot.clone(),
            config.safety.max_consecutive_current_violations,
        )
    }

    /// Replace the robot description. Drops the current binding; every
    /// buffer is resized and zeroed. The violation maximum is kept.
    pub fn configure(&mut self, config: RobotConfig) -> Result<(), RobotError> {
        let maximum = self.safety.violations.maximum();
        *self = Self::new(config, maximum)?;
        Ok(())
    }

    /// Bind actuators and brakes to board axes, replacing any previous binding.
    ///
    /// # Errors
    /// [`RobotError::Configuration`], see [`BoardBinding::new`].
    pub fn bind(&mut self, actuators: Vec<AxisBinding>, brakes: Vec<AxisBinding>) -> Result<(), RobotError> {
        let binding = BoardBinding::new(
            &self.config.name,
            actuators,
            brakes,
            self.calibration.number_of_actuators(),
            self.calibration.number_of_brakes(),
        )?;
        info!(
            robot = %self.config.name,
            boards = ?binding.board_ids().as_slice(),
            velocity_counter = ?binding.velocity_counter(),
            "boards bound"
        );
        self.binding = Some(binding);
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Latch raw registers of every bound axis.
    pub fn poll_state(&mut self) -> Result<(), RobotError> {
        let binding = bound(&self.config.name, &self.binding)?;
        self.raw.poll(binding.actuators(), binding.brakes());
        Ok(())
    }

    /// Derive physical quantities from the last poll. No-op before binding.
    pub fn convert_state(&mut self) {
        if let Some(binding) = &self.binding {
            convert_state(
                &self.calibration,
                &self.raw,
                binding.velocity_counter(),
                &mut self.converted,
            );
        }
    }

    /// Full read half of a cycle: validity, poll, convert, interlock check.
    ///
    /// Stops at the first error; a [`RobotError::ReadValidity`] leaves the
    /// previous cycle's state in place.
    pub fn read_cycle(&mut self) -> Result<(), RobotError> {
        self.poll_validity()?;
        self.poll_state()?;
        self.convert_state();
        debug!(robot = %self.config.name, "state converted");
        self.check_state()
    }

    // ── Accessors ──

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn binding(&self) -> Option<&BoardBinding> {
        self.binding.as_ref()
    }

    pub fn number_of_actuators(&self) -> usize {
        self.calibration.number_of_actuators()
    }

    pub fn number_of_joints(&self) -> usize {
        self.calibration.number_of_joints()
    }

    pub fn number_of_brakes(&self) -> usize {
        self.calibration.number_of_brakes()
    }

    pub fn joint_types(&self) -> &[JointType] {
        self.calibration.joint_types()
    }

    pub fn raw(&self) -> &RawState {
        &self.raw
    }

    pub fn converted(&self) -> &ConvertedState {
        &self.converted
    }

    pub fn safety(&self) -> &SafetyState {
        &self.safety
    }

    pub fn command(&self) -> &CommandState {
        &self.command
    }

    pub fn valid(&self) -> bool {
        self.safety.valid
    }

    pub fn power_status(&self) -> bool {
        self.safety.power
    }

    pub fn previous_power_status(&self) -> bool {
        self.safety.previous_power
    }

    pub fn safety_relay(&self) -> bool {
        self.safety.safety_relay
    }

    pub fn watchdog_timeout(&self) -> bool {
        self.safety.watchdog_timeout
    }

    pub fn previous_watchdog_timeout(&self) -> bool {
        self.safety.previous_watchdog_timeout
    }

    pub fn power_lost(&self) -> bool {
        self.safety.power_lost()
    }

    pub fn watchdog_tripped(&self) -> bool {
        self.safety.watchdog_tripped()
    }

    pub fn consecutive_current_violations(&self) -> usize {
        self.safety.violations.consecutive()
    }

    pub fn actuator_timestamps(&self) -> &[f64] {
        &self.raw.actuators.timestamp_s
    }

    pub fn brake_timestamps(&self) -> &[f64] {
        &self.raw.brakes.timestamp_s
    }

    pub fn actuator_amp_status(&self) -> &[bool] {
        &self.raw.actuators.amp_status
    }

    pub fn actuator_amp_enable(&self) -> &[bool] {
        &self.raw.actuators.amp_enable
    }

    pub fn brake_amp_status(&self) -> &[bool] {
        &self.raw.brakes.amp_status
    }

    pub fn brake_amp_enable(&self) -> &[bool] {
        &self.raw.brakes.amp_enable
    }

    pub fn actuator_temperatures(&self) -> &[f64] {
        &self.raw.actuators.temperature
    }

    pub fn brake_temperatures(&self) -> &[f64] {
        &self.raw.brakes.temperature
    }

    pub fn digital_inputs(&self) -> &[u32] {
        &self.raw.actuators.digital_inputs
    }

    pub fn encoder_position(&self) -> &[f64] {
        &self.converted.encoder_position.current
    }

    pub fn encoder_position_previous(&self) -> &[f64] {
        &self.converted.encoder_position.previous
    }

    pub fn encoder_velocity(&self) -> &[f64] {
        &self.converted.encoder_velocity
    }

    pub fn joint_position(&self) -> &[f64] {
        &self.converted.joint_position
    }

    pub fn joint_velocity(&self) -> &[f64] {
        &self.converted.joint_velocity
    }

    pub fn pot_voltage(&self) -> &[f64] {
        &self.converted.pot_voltage
    }

    pub fn pot_position(&self) -> &[f64] {
        &self.converted.pot_position
    }

    pub fn actuator_current_feedback(&self) -> &[f64] {
        &self.converted.actuator_current_feedback
    }

    pub fn actuator_effort_feedback(&self) -> &[f64] {
        &self.converted.actuator_effort_feedback
    }

    pub fn brake_current_feedback(&self) -> &[f64] {
        &self.converted.brake_current_feedback
    }

    pub fn actuator_effort_command_limits(&self) -> &[f64] {
        &self.calibration.actuator_drive().effort_command_limits
    }

    pub fn actuator_current_command_limits(&self) -> &[f64] {
        &self.calibration.actuator_drive().current_command_limits
    }

    pub fn actuator_current_feedback_limits(&self) -> &[f64] {
        &self.calibration.actuator_drive().current_feedback_limits
    }

    pub fn brake_current_command_limits(&self) -> &[f64] {
        &self.calibration.brake_drive().current_command_limits
    }

    pub fn brake_current_feedback_limits(&self) -> &[f64] {
        &self.calibration.brake_drive().current_feedback_limits
    }

    pub fn joint_effort_command_limits(&self) -> &[f64] {
        self.calibration.joint_effort_command_limits()
    }
}

/// Binding table, or a configuration error naming the robot.
pub(crate) fn bound<'a>(robot: &str, binding: &'a Option<BoardBinding>) -> Result<&'a BoardBinding, RobotError> {
    binding
        .as_ref()
        .ok_or_else(|| RobotError::configuration(robot, "boards are not bound"))
}
