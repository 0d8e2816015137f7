//! Aggregated board status and over-current debounce.

use rio_common::consts::DEFAULT_MAX_CURRENT_VIOLATIONS;

/// Consecutive over-current cycle counter.
///
/// Any clean cycle resets the count to zero; there is no partial decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViolationCounter {
    consecutive: usize,
    maximum: usize,
}

impl ViolationCounter {
    pub const fn new(maximum: usize) -> Self {
        Self {
            consecutive: 0,
            maximum,
        }
    }

    /// Record one cycle. Returns `true` when the count exceeds the maximum.
    pub fn record(&mut self, violating: bool) -> bool {
        self.consecutive = if violating {
            self.consecutive.saturating_add(1)
        } else {
            0
        };
        self.consecutive > self.maximum
    }

    pub const fn consecutive(&self) -> usize {
        self.consecutive
    }

    pub const fn maximum(&self) -> usize {
        self.maximum
    }

    pub fn reset(&mut self) {
        self.consecutive = 0;
    }
}

impl Default for ViolationCounter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CURRENT_VIOLATIONS)
    }
}

/// Logical AND of every bound board's status, plus previous-cycle values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SafetyState {
    pub valid: bool,
    pub power: bool,
    pub previous_power: bool,
    pub safety_relay: bool,
    pub watchdog_timeout: bool,
    pub previous_watchdog_timeout: bool,
    pub violations: ViolationCounter,
}

impl SafetyState {
    pub fn new(max_consecutive_violations: usize) -> Self {
        Self {
            violations: ViolationCounter::new(max_consecutive_violations),
            ..Default::default()
        }
    }

    /// Shift this cycle's power and watchdog flags into the previous slots.
    pub fn begin_cycle(&mut self) {
        self.previous_power = self.power;
        self.previous_watchdog_timeout = self.watchdog_timeout;
    }

    /// Power dropped since the previous poll.
    pub fn power_lost(&self) -> bool {
        self.previous_power && !self.power
    }

    /// Watchdog timeout flag rose since the previous poll.
    pub fn watchdog_tripped(&self) -> bool {
        self.watchdog_timeout && !self.previous_watchdog_timeout
    }
}
