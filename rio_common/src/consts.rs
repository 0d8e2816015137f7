//! System-wide constants for the RIO workspace.
//!
//! Single source of truth for board clock rates, register sentinels and
//! safety margins. Imported by all crates — no duplication permitted.

use static_assertions::const_assert;
use std::time::Duration;

/// Maximum number of unique boards a single robot may be bound to.
pub const MAX_BOARDS: usize = 16;

/// Number of motor axes exposed by one amplifier board.
pub const AXES_PER_BOARD: usize = 4;

/// Board timestamp clock [ticks/s].
pub const BOARD_CLOCK_HZ: f64 = 49_125_000.0;

/// Watchdog period register resolution [counts/ms].
pub const WATCHDOG_MS_TO_COUNT: f64 = 192.0;

/// Settling time between board power-up and axis amp-enable.
pub const POWER_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Amp-enable mask covering every axis on a board.
pub const ALL_AXES_MASK: u32 = 0x0f;

/// Velocity counter value meaning "no edge seen, velocity unknown".
pub const VELOCITY_SENTINEL: u32 = 0x8000;

/// Below this many latched ticks the velocity counter is replaced by dx/dt.
pub const VELOCITY_MIN_TICKS: i32 = 100;

/// First firmware generation that reports a usable "now" velocity counter.
pub const VELOCITY_NOW_FIRMWARE: u32 = 4;

/// Feedback current limit as a multiple of the command limit.
pub const FEEDBACK_LIMIT_RATIO: f64 = 1.2;

/// Fixed feedback current margin for A/D noise [A].
pub const FEEDBACK_LIMIT_MARGIN_A: f64 = 50.0 / 1000.0;

/// Default number of consecutive over-current cycles tolerated.
pub const DEFAULT_MAX_CURRENT_VIOLATIONS: usize = 100;

const_assert!(MAX_BOARDS <= 16);
const_assert!(ALL_AXES_MASK.count_ones() as usize == AXES_PER_BOARD);
const_assert!(VELOCITY_SENTINEL <= u16::MAX as u32);

/// Feedback current limit derived from a command current limit.
#[inline]
pub fn feedback_current_limit(command_limit: f64) -> f64 {
    FEEDBACK_LIMIT_RATIO * command_limit + FEEDBACK_LIMIT_MARGIN_A
}
