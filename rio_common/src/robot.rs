//! Robot-level shared types.
//!
//! This module contains the configuration schema consumed by the core,
//! the interface of the amplifier boards it drives, and the errors it
//! reports.

pub mod board;
pub mod config;
pub mod error;
