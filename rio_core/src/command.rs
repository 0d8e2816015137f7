//! Command path.
//!
//! `set_joint_effort → set_actuator_effort → set_actuator_current →
//! set_actuator_current_bits`, each stage changing space or unit. Only the
//! current stage clips. Brakes start at the current stage.

use rio_common::robot::board::AxisBinding;
use rio_common::robot::error::RobotError;
use tracing::warn;

use crate::convert::mapping::map;
use crate::robot::{bound, Robot};

/// Clamp each value to `[-limit, limit]` in place.
pub fn clip_symmetric(values: &mut [f64], limits: &[f64]) {
    for (v, &limit) in values.iter_mut().zip(limits) {
        *v = v.clamp(-limit.abs(), limit.abs());
    }
}

fn dispatch_current_bits(robot: &str, bindings: &[AxisBinding], bits: &[i32]) {
    for (binding, &b) in bindings.iter().zip(bits) {
        let mut board = binding.board.lock();
        // register takes the two's-complement word
        if !board.set_motor_current(binding.axis, b as u32) {
            warn!(robot, board = board.board_id(), axis = binding.axis, bits = b, "motor current rejected");
        }
    }
}

fn preload(robot: &str, binding: &AxisBinding, bits: i32) {
    let mut board = binding.board.lock();
    if !board.write_encoder_preload(binding.axis, bits) {
        warn!(robot, board = board.board_id(), axis = binding.axis, bits, "encoder preload rejected");
    }
}

impl Robot {
    pub(crate) fn check_len(&self, what: &'static str, expected: usize, actual: usize) -> Result<(), RobotError> {
        if expected == actual {
            return Ok(());
        }
        Err(RobotError::CommandLength {
            robot: self.config.name.clone(),
            what,
            expected,
            actual,
        })
    }

    // ── Clipping ──

    pub fn clip_actuator_effort(&self, efforts: &mut [f64]) {
        clip_symmetric(efforts, &self.calibration.actuator_drive().effort_command_limits);
    }

    pub fn clip_actuator_current(&self, currents: &mut [f64]) {
        clip_symmetric(currents, &self.calibration.actuator_drive().current_command_limits);
    }

    pub fn clip_brake_current(&self, currents: &mut [f64]) {
        clip_symmetric(currents, &self.calibration.brake_drive().current_command_limits);
    }

    // ── Actuators ──

    /// Map joint efforts to actuator efforts and dispatch.
    pub fn set_joint_effort(&mut self, efforts: &[f64]) -> Result<(), RobotError> {
        self.check_len("joint efforts", self.number_of_joints(), efforts.len())?;
        let actuator_efforts = map(&self.calibration.mapping().joint_to_actuator_effort, efforts);
        self.set_actuator_effort(&actuator_efforts)
    }

    pub fn set_actuator_effort(&mut self, efforts: &[f64]) -> Result<(), RobotError> {
        self.check_len("actuator efforts", self.number_of_actuators(), efforts.len())?;
        let mut currents = vec![0.0; efforts.len()];
        self.calibration.actuator_effort_to_current(efforts, &mut currents);
        self.set_actuator_current(&currents)
    }

    /// Clip to the current command limits, convert and dispatch.
    pub fn set_actuator_current(&mut self, currents: &[f64]) -> Result<(), RobotError> {
        self.check_len("actuator currents", self.number_of_actuators(), currents.len())?;
        bound(&self.config.name, &self.binding)?;
        let mut clipped = currents.to_vec();
        self.clip_actuator_current(&mut clipped);
        let mut bits = vec![0; clipped.len()];
        self.calibration.actuator_current_to_bits(&clipped, &mut bits);
        self.set_actuator_current_bits(&bits)?;
        self.command.actuator_current = clipped;
        Ok(())
    }

    pub fn set_actuator_current_bits(&mut self, bits: &[i32]) -> Result<(), RobotError> {
        self.check_len("actuator current bits", self.number_of_actuators(), bits.len())?;
        let binding = bound(&self.config.name, &self.binding)?;
        dispatch_current_bits(&self.config.name, binding.actuators(), bits);
        self.command.actuator_current_bits.copy_from_slice(bits);
        Ok(())
    }

    // ── Brakes ──

    pub fn set_brake_current(&mut self, currents: &[f64]) -> Result<(), RobotError> {
        self.check_len("brake currents", self.number_of_brakes(), currents.len())?;
        bound(&self.config.name, &self.binding)?;
        let mut clipped = currents.to_vec();
        self.clip_brake_current(&mut clipped);
        let mut bits = vec![0; clipped.len()];
        self.calibration.brake_current_to_bits(&clipped, &mut bits);
        self.set_brake_current_bits(&bits)?;
        self.command.brake_current = clipped;
        Ok(())
    }

    pub fn set_brake_current_bits(&mut self, bits: &[i32]) -> Result<(), RobotError> {
        self.check_len("brake current bits", self.number_of_brakes(), bits.len())?;
        let binding = bound(&self.config.name, &self.binding)?;
        dispatch_current_bits(&self.config.name, binding.brakes(), bits);
        self.command.brake_current_bits.copy_from_slice(bits);
        Ok(())
    }

    /// Apply the brake release current.
    pub fn brake_release(&mut self) -> Result<(), RobotError> {
        let currents = self.calibration.brake_profile().release_current.clone();
        self.set_brake_current(&currents)
    }

    /// Apply the holding current once released.
    pub fn brake_released(&mut self) -> Result<(), RobotError> {
        let currents = self.calibration.brake_profile().released_current.clone();
        self.set_brake_current(&currents)
    }

    pub fn brake_engaged(&mut self) -> Result<(), RobotError> {
        let currents = self.calibration.brake_profile().engaged_current.clone();
        self.set_brake_current(&currents)
    }

    // ── Encoder preload ──

    /// Preload every encoder so it reads `positions`.
    pub fn set_encoder_position(&self, positions: &[f64]) -> Result<(), RobotError> {
        self.check_len("encoder positions", self.number_of_actuators(), positions.len())?;
        let mut bits = vec![0; positions.len()];
        self.calibration.encoder_position_to_bits(positions, &mut bits);
        self.set_encoder_position_bits(&bits)
    }

    pub fn set_encoder_position_bits(&self, bits: &[i32]) -> Result<(), RobotError> {
        self.check_len("encoder position bits", self.number_of_actuators(), bits.len())?;
        let binding = bound(&self.config.name, &self.binding)?;
        for (b, &value) in binding.actuators().iter().zip(bits) {
            preload(&self.config.name, b, value);
        }
        Ok(())
    }

    pub fn set_single_encoder_position(&self, index: usize, position: f64) -> Result<(), RobotError> {
        let e = self.calibration.encoder();
        let (scale, offset) = match (
            e.bits_to_position_scales.get(index),
            e.bits_to_position_offsets.get(index),
        ) {
            (Some(s), Some(o)) => (*s, *o),
            _ => return Err(self.index_error(index)),
        };
        self.set_single_encoder_position_bits(index, ((position - offset) / scale).round() as i32)
    }

    pub fn set_single_encoder_position_bits(&self, index: usize, bits: i32) -> Result<(), RobotError> {
        let binding = bound(&self.config.name, &self.binding)?;
        let axis = binding
            .actuators()
            .get(index)
            .ok_or_else(|| self.index_error(index))?;
        preload(&self.config.name, axis, bits);
        Ok(())
    }

    fn index_error(&self, index: usize) -> RobotError {
        RobotError::CommandLength {
            robot: self.config.name.clone(),
            what: "actuator index",
            expected: self.number_of_actuators(),
            actual: index,
        }
    }
}
