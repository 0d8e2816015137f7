//! # RIO Core Library
//!
//! State-conversion and safety-interlock core of a real-time controller for
//! robots driven by a bank of motor-amplifier boards. Turns raw register
//! values into physical units, physical commands back into register values,
//! enforces current safety interlocks and sequences amplifier power.
//!
//! ## Cycle
//!
//! The embedding scheduler calls, in order, once per control period:
//!
//! 1. [`Robot::poll_validity`] — aggregate board read/power/relay/watchdog status
//! 2. [`Robot::poll_state`] — latch raw registers of every bound axis
//! 3. [`Robot::convert_state`] — raw bits → positions, velocities, currents
//! 4. [`Robot::check_state`] — over-current debounce and hardware fault check
//! 5. command calls ([`Robot::set_joint_effort`] and friends)
//!
//! ## Layers
//!
//! - [`calibration`] — immutable per-axis coefficients and derived limits
//! - [`binding`] — actuator/brake → (board, axis), deduplicated boards
//! - [`state`] — raw, converted, safety and command state buffers
//! - [`convert`] — bits ↔ physical units, velocity estimation, joint mapping
//! - [`safety`] — validity aggregation, interlock, power sequencing
//! - [`command`] — clipping and dispatch of current commands
//! - [`calibrate`] — potentiometer-based encoder offset correction

pub mod binding;
pub mod calibrate;
pub mod calibration;
pub mod command;
pub mod convert;
pub mod robot;
pub mod safety;
pub mod state;

pub use crate::robot::Robot;
