//! Power, relay, amp-enable and watchdog sequencing.
//!
//! Three binary layers per board: safety relay, board power, per-axis amp
//! enable. Power comes up relay → board → (settle) → axes and goes down
//! axes on every board → board power → relay.

use std::thread;

use rio_common::consts::{POWER_SETTLE_DELAY, WATCHDOG_MS_TO_COUNT};
use rio_common::robot::board::{AxisBinding, AxisMask, BoardId};
use rio_common::robot::error::RobotError;
use tracing::{info, warn};

use crate::binding::BoardBinding;
use crate::robot::{bound, Robot};

/// Watchdog register counts for a period in seconds. `0.0` disables the
/// watchdog; any other period is at least one count.
pub fn watchdog_counts(period_s: f64) -> u32 {
    if period_s == 0.0 {
        return 0;
    }
    ((period_s * 1000.0 * WATCHDOG_MS_TO_COUNT) as u32).max(1)
}

fn check_write(robot: &str, board: BoardId, what: &'static str, accepted: bool) {
    if !accepted {
        warn!(robot, board, what, "board write rejected");
    }
}

/// Clear amp-enable on every board, then board power and relay.
pub(crate) fn disable_all(robot: &str, binding: &BoardBinding) {
    for (id, board) in binding.boards() {
        let accepted = board.lock().write_amp_enable(AxisMask::all(), AxisMask::empty());
        check_write(robot, id, "amp enable", accepted);
    }
    disable_boards(robot, binding);
}

fn disable_boards(robot: &str, binding: &BoardBinding) {
    for (id, board) in binding.boards() {
        let mut board = board.lock();
        check_write(robot, id, "power enable", board.write_power_enable(false));
        check_write(robot, id, "safety relay", board.write_safety_relay(false));
    }
}

fn set_amp_enable(robot: &str, bindings: &[AxisBinding], enabled: impl Fn(usize) -> bool) {
    for (index, binding) in bindings.iter().enumerate() {
        let mut board = binding.board.lock();
        if !board.set_amp_enable(binding.axis, enabled(index)) {
            warn!(robot, board = board.board_id(), axis = binding.axis, "amp enable rejected");
        }
    }
}

impl Robot {
    /// Relay and board power on, wait [`POWER_SETTLE_DELAY`], then enable
    /// every actuator and brake amplifier. Resets the violation counter.
    pub fn enable_power(&mut self) -> Result<(), RobotError> {
        self.enable_boards_power()?;
        thread::sleep(POWER_SETTLE_DELAY);
        self.set_actuator_power(true)?;
        self.set_brake_power(true)?;
        self.safety.violations.reset();
        info!(robot = %self.config.name, "power enabled");
        Ok(())
    }

    /// Amp-enable off on every board before any board power or relay write.
    pub fn disable_power(&self) -> Result<(), RobotError> {
        let binding = bound(&self.config.name, &self.binding)?;
        disable_all(&self.config.name, binding);
        info!(robot = %self.config.name, "power disabled");
        Ok(())
    }

    pub fn enable_boards_power(&self) -> Result<(), RobotError> {
        let binding = bound(&self.config.name, &self.binding)?;
        for (id, board) in binding.boards() {
            let mut board = board.lock();
            check_write(&self.config.name, id, "safety relay", board.write_safety_relay(true));
            check_write(&self.config.name, id, "power enable", board.write_power_enable(true));
        }
        info!(robot = %self.config.name, boards = binding.board_count(), "board power enabled");
        Ok(())
    }

    /// Board power then relay off, leaving amp-enable registers alone.
    pub fn disable_board_power(&self) -> Result<(), RobotError> {
        let binding = bound(&self.config.name, &self.binding)?;
        disable_boards(&self.config.name, binding);
        info!(robot = %self.config.name, "board power disabled");
        Ok(())
    }

    /// Buffered safety relay request on every board.
    pub fn set_safety_relay(&self, enabled: bool) -> Result<(), RobotError> {
        let binding = bound(&self.config.name, &self.binding)?;
        for (_, board) in binding.boards() {
            board.lock().set_safety_relay(enabled);
        }
        Ok(())
    }

    /// Write the watchdog period to every board; `0.0` disables it.
    pub fn set_watchdog_period(&self, period_s: f64) -> Result<(), RobotError> {
        let binding = bound(&self.config.name, &self.binding)?;
        let counts = watchdog_counts(period_s);
        for (id, board) in binding.boards() {
            let accepted = board.lock().write_watchdog_period(counts);
            check_write(&self.config.name, id, "watchdog period", accepted);
        }
        info!(robot = %self.config.name, period_s, counts, "watchdog period set");
        Ok(())
    }

    pub fn set_actuator_power(&self, enabled: bool) -> Result<(), RobotError> {
        let binding = bound(&self.config.name, &self.binding)?;
        set_amp_enable(&self.config.name, binding.actuators(), |_| enabled);
        Ok(())
    }

    /// Per-actuator amp-enable.
    ///
    /// # Errors
    /// [`RobotError::CommandLength`] if `enabled` is not one flag per actuator.
    pub fn set_actuator_power_each(&self, enabled: &[bool]) -> Result<(), RobotError> {
        let binding = bound(&self.config.name, &self.binding)?;
        self.check_len("actuator power", self.number_of_actuators(), enabled.len())?;
        set_amp_enable(&self.config.name, binding.actuators(), |i| enabled[i]);
        Ok(())
    }

    pub fn set_brake_power(&self, enabled: bool) -> Result<(), RobotError> {
        let binding = bound(&self.config.name, &self.binding)?;
        set_amp_enable(&self.config.name, binding.brakes(), |_| enabled);
        Ok(())
    }

    pub fn set_brake_power_each(&self, enabled: &[bool]) -> Result<(), RobotError> {
        let binding = bound(&self.config.name, &self.binding)?;
        self.check_len("brake power", self.number_of_brakes(), enabled.len())?;
        set_amp_enable(&self.config.name, binding.brakes(), |i| enabled[i]);
        Ok(())
    }
}
