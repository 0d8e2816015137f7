//! Safety layer.
//!
//! - [`validity`] — aggregate board read/power/relay/watchdog status
//! - [`interlock`] — over-current debounce and hardware fault escalation
//! - [`power`] — relay, board power, amp-enable and watchdog sequencing

pub mod interlock;
pub mod power;
pub mod validity;
