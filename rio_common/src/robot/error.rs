//! Error taxonomy of the robot core.
//!
//! Every variant carries the robot name so a postmortem log line is
//! self-describing. Board lists use a fixed-capacity vector so that
//! per-cycle diagnostics need no heap growth beyond the robot name.

use crate::consts::MAX_BOARDS;
use crate::robot::board::BoardId;
use thiserror::Error;

/// Fixed-capacity list of board identifiers.
pub type BoardIds = heapless::Vec<BoardId, MAX_BOARDS>;

/// Errors raised synchronously by the core's cycle and command steps.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RobotError {
    /// Size/count mismatch at construction or bind time.
    #[error("{robot}: configuration error: {reason}")]
    Configuration { robot: String, reason: String },

    /// One or more boards failed this cycle's read.
    #[error("{robot}: read error on board(s) {}", join_ids(.boards))]
    ReadValidity { robot: String, boards: BoardIds },

    /// Consecutive software current-limit breaches exceeded the maximum.
    /// Power has already been disabled when this is returned.
    #[error(
        "{robot}: too many consecutive current safety violations ({consecutive} > {maximum}). Power has been disabled."
    )]
    SafetyViolation {
        robot: String,
        consecutive: usize,
        maximum: usize,
    },

    /// Board-level safety amp-disable tripped.
    #[error("{robot}: hardware current safety amp-disable tripped on board(s) {} (timestamps {timestamps:?})", join_ids(.boards))]
    HardwareFault {
        robot: String,
        boards: BoardIds,
        timestamps: Vec<f64>,
    },

    /// Caller-supplied vector or index does not match the robot.
    #[error("{robot}: {what}: expected {expected}, got {actual}")]
    CommandLength {
        robot: String,
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl RobotError {
    /// Shorthand for [`RobotError::Configuration`].
    pub fn configuration(robot: &str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            robot: robot.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true if the core cut power before returning this error.
    #[inline]
    pub const fn power_disabled(&self) -> bool {
        matches!(self, Self::SafetyViolation { .. })
    }

    /// Returns true if the caller must stop commanding the robot.
    #[inline]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::ReadValidity { .. } | Self::CommandLength { .. })
    }

    /// Name of the robot that raised the error.
    pub fn robot(&self) -> &str {
        match self {
            Self::Configuration { robot, .. }
            | Self::ReadValidity { robot, .. }
            | Self::SafetyViolation { robot, .. }
            | Self::HardwareFault { robot, .. }
            | Self::CommandLength { robot, .. } => robot,
        }
    }
}

fn join_ids(ids: &[BoardId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
