//! Encoder velocity estimation.
//!
//! Two estimators are available every cycle:
//!
//! 1. **Counter** — the board latches the clock ticks between the last two
//!    encoder edges (`latched`) and keeps counting since the last edge
//!    (`now`). Velocity is `dposition_scale / ticks`.
//! 2. **Derivative** — `(position − previous) / elapsed`.
//!
//! The counter estimate is used unless the latched tick count is so small
//! that its quantisation dominates, in which case the derivative is used.

use rio_common::consts::{VELOCITY_MIN_TICKS, VELOCITY_NOW_FIRMWARE, VELOCITY_SENTINEL};

/// How the velocity counters of the bound boards may be combined.
///
/// Computed once at bind time from the firmware of every bound board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityCounter {
    /// Only the latched counter is trustworthy.
    LatchedOnly,
    /// The running "now" counter may replace a stale latched value.
    LatchedOrNow,
}

impl VelocityCounter {
    /// Capability shared by all boards with the given firmware versions.
    pub fn for_firmware(mut versions: impl Iterator<Item = u32>) -> Self {
        if versions.all(|v| v >= VELOCITY_NOW_FIRMWARE) {
            Self::LatchedOrNow
        } else {
            Self::LatchedOnly
        }
    }
}

/// Sign-extend the low 16 bits of a counter word.
#[inline]
pub const fn sign_extend_16(word: u32) -> i32 {
    ((word << 16) as i32) >> 16
}

/// Sign-extend the low 24 bits of an encoder position register.
#[inline]
pub const fn sign_extend_24(word: u32) -> i32 {
    ((word << 8) as i32) >> 8
}

/// Ticks the counter estimate divides by, `None` when either word is the sentinel.
pub fn corrected_ticks(latched: u32, now: u32, counter: VelocityCounter) -> Option<i32> {
    if latched == VELOCITY_SENTINEL || now == VELOCITY_SENTINEL {
        return None;
    }
    let latched = sign_extend_16(latched);
    let now = sign_extend_16(now);
    // still slowing down in the same direction: the running count is fresher
    let slowing = (now > latched && latched > 0) || (now < latched && latched < 0);
    if counter == VelocityCounter::LatchedOrNow && slowing {
        Some(now)
    } else {
        Some(latched)
    }
}

/// Counter-based velocity; 0 for the sentinel or a zero tick count.
pub fn counter_velocity(latched: u32, now: u32, counter: VelocityCounter, dposition_scale: f64) -> f64 {
    match corrected_ticks(latched, now, counter) {
        None | Some(0) => 0.0,
        Some(ticks) => dposition_scale / f64::from(ticks),
    }
}

/// Position derivative; 0 for a non-positive elapsed time.
#[inline]
pub fn derivative_velocity(position: f64, previous: f64, elapsed_s: f64) -> f64 {
    if elapsed_s > 0.0 {
        (position - previous) / elapsed_s
    } else {
        0.0
    }
}

/// Whether the latched counter is too coarse to use.
#[inline]
pub fn latched_too_coarse(latched: u32) -> bool {
    sign_extend_16(latched).abs() < VELOCITY_MIN_TICKS
}

/// Combined estimate reported as the encoder velocity.
pub fn select_velocity(latched: u32, now: u32, counter_estimate: f64, derivative_estimate: f64) -> f64 {
    if latched == VELOCITY_SENTINEL || now == VELOCITY_SENTINEL {
        0.0
    } else if latched_too_coarse(latched) {
        derivative_estimate
    } else {
        counter_estimate
    }
}
