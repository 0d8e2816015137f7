//! Board validity and power-status aggregation.

use rio_common::robot::board::Board;
use rio_common::robot::error::{BoardIds, RobotError};
use tracing::warn;

use crate::robot::{bound, Robot};

/// Status flags of one board, or their AND across several boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardStatus {
    pub valid: bool,
    pub power: bool,
    pub safety_relay: bool,
    pub watchdog_timeout: bool,
}

impl BoardStatus {
    /// Identity of [`BoardStatus::and`].
    pub const ALL_SET: Self = Self {
        valid: true,
        power: true,
        safety_relay: true,
        watchdog_timeout: true,
    };

    pub fn read(board: &dyn Board) -> Self {
        Self {
            valid: board.valid_read(),
            power: board.power_status(),
            safety_relay: board.safety_relay_status(),
            watchdog_timeout: board.watchdog_timeout_status(),
        }
    }

    pub const fn and(self, other: Self) -> Self {
        Self {
            valid: self.valid && other.valid,
            power: self.power && other.power,
            safety_relay: self.safety_relay && other.safety_relay,
            watchdog_timeout: self.watchdog_timeout && other.watchdog_timeout,
        }
    }
}

impl Robot {
    /// Recompute validity, power, relay and watchdog status as the logical
    /// AND over every bound board. Runs before [`Robot::poll_state`].
    ///
    /// # Errors
    /// - [`RobotError::Configuration`] before binding
    /// - [`RobotError::ReadValidity`] naming every board whose read failed
    pub fn poll_validity(&mut self) -> Result<(), RobotError> {
        let binding = bound(&self.config.name, &self.binding)?;
        self.safety.begin_cycle();

        let mut status = BoardStatus::ALL_SET;
        let mut invalid = BoardIds::new();
        for (id, board) in binding.boards() {
            let board_status = BoardStatus::read(&*board.lock());
            if !board_status.valid {
                // binding holds at most MAX_BOARDS boards
                let _ = invalid.push(id);
            }
            status = status.and(board_status);
        }

        self.safety.valid = status.valid;
        self.safety.power = status.power;
        self.safety.safety_relay = status.safety_relay;
        self.safety.watchdog_timeout = status.watchdog_timeout;

        if invalid.is_empty() {
            return Ok(());
        }
        warn!(robot = %self.config.name, boards = ?invalid.as_slice(), "board read failed");
        Err(RobotError::ReadValidity {
            robot: self.config.name.clone(),
            boards: invalid,
        })
    }
}
