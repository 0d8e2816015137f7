//! Current safety interlock.
//!
//! Software check: any actuator or brake with `|feedback| >= limit` makes the
//! cycle violating; more than the configured number of consecutive violating
//! cycles cuts power. Hardware check: a board whose own current interlock
//! disabled an amplifier is fatal immediately.

use rio_common::robot::board::AxisMask;
use rio_common::robot::error::{BoardIds, RobotError};
use tracing::{error, warn};

use super::power::disable_all;
use crate::binding::BoardBinding;
use crate::robot::{bound, Robot};

/// Count feedback currents at or above their limit, logging each breach.
pub fn over_limit(robot: &str, kind: &'static str, feedback: &[f64], limits: &[f64]) -> usize {
    let mut breaches = 0;
    for (index, (current, limit)) in feedback.iter().zip(limits).enumerate() {
        if current.abs() >= *limit {
            warn!(robot, kind, index, current, limit, "current feedback over limit");
            breaches += 1;
        }
    }
    breaches
}

/// Boards reporting a hardware safety amp-disable.
pub fn faulted_boards(binding: &BoardBinding) -> BoardIds {
    let mut faulted = BoardIds::new();
    for (id, board) in binding.boards() {
        if board.lock().safety_amp_disable() != AxisMask::empty() {
            // binding holds at most MAX_BOARDS boards
            let _ = faulted.push(id);
        }
    }
    faulted
}

impl Robot {
    /// Post-conversion safety check.
    ///
    /// Latches the current encoder position as the previous one first, on
    /// every call.
    ///
    /// # Errors
    /// - [`RobotError::SafetyViolation`] once the consecutive violation count
    ///   exceeds the maximum; all power is disabled before returning
    /// - [`RobotError::HardwareFault`] naming every board with a safety
    ///   amp-disable, whatever the violation count
    pub fn check_state(&mut self) -> Result<(), RobotError> {
        self.converted.encoder_position.latch();
        let name = &self.config.name;
        let binding = bound(name, &self.binding)?;

        let breaches = over_limit(
            name,
            "actuator",
            &self.converted.actuator_current_feedback,
            &self.calibration.actuator_drive().current_feedback_limits,
        ) + over_limit(
            name,
            "brake",
            &self.converted.brake_current_feedback,
            &self.calibration.brake_drive().current_feedback_limits,
        );

        if self.safety.violations.record(breaches > 0) {
            let consecutive = self.safety.violations.consecutive();
            let maximum = self.safety.violations.maximum();
            error!(robot = %name, consecutive, maximum, "current safety violation, disabling power");
            disable_all(name, binding);
            return Err(RobotError::SafetyViolation {
                robot: name.clone(),
                consecutive,
                maximum,
            });
        }

        let faulted = faulted_boards(binding);
        if !faulted.is_empty() {
            error!(robot = %name, boards = ?faulted.as_slice(), "hardware safety amp-disable");
            return Err(RobotError::HardwareFault {
                robot: name.clone(),
                boards: faulted,
                timestamps: self.raw.actuators.timestamp_s.clone(),
            });
        }
        Ok(())
    }
}
