//! Prelude module for common re-exports.
//!
//! ```rust
//! use rio_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;
pub use crate::logging::init_tracing;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, RioConfig, SafetyConfig, SharedConfig};
pub use crate::robot::config::{
    ActuatorConfig, BrakeConfig, DriveConfig, EncoderConfig, JointType, PotConfig, PotLocation,
    RobotConfig,
};

// ─── Boards ─────────────────────────────────────────────────────────
pub use crate::robot::board::{AxisBinding, AxisMask, Board, BoardHandle, BoardId};

// ─── Errors ─────────────────────────────────────────────────────────
pub use crate::robot::error::{BoardIds, RobotError};
