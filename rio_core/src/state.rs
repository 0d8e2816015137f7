//! Per-robot state buffers.
//!
//! Organized by producer:
//! - [`raw`] — register values latched by the poll step
//! - [`converted`] — physical quantities derived by the convert step
//! - [`safety`] — aggregated board status and the violation debounce counter
//! - [`command`] — last dispatched commands, for telemetry

pub mod command;
pub mod converted;
pub mod raw;
pub mod safety;

pub use command::CommandState;
pub use converted::{ConvertedState, EncoderPositions};
pub use raw::{ActuatorRaw, BrakeRaw, RawState};
pub use safety::{SafetyState, ViolationCounter};
