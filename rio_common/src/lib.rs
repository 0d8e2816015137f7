//! RIO Common Library
//!
//! Shared vocabulary for the RIO robot core: constants, the parsed robot
//! configuration schema, the amplifier board interface and the error
//! taxonomy reported by every cycle step.
//!
//! # Module Structure
//!
//! - [`consts`] - Clock rates, watchdog scaling and safety constants
//! - [`config`] - TOML configuration loading traits and types
//! - [`logging`] - `tracing` subscriber bootstrap
//! - [`robot`] - Robot configuration, board trait, bindings and errors
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use rio_common::prelude::*;
//! use rio_common::consts::BOARD_CLOCK_HZ;
//! ```

pub mod config;
pub mod consts;
pub mod logging;
pub mod prelude;
pub mod robot;
