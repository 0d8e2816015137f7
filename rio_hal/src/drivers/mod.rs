//! Board implementations.
//!
//! - [`simulation`] - Software boards for development and testing
//!
//! # Adding New Boards
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `Board` trait from `rio_common::robot::board`
//! 3. Hand `BoardHandle`s to `rio_core::Robot::bind`

pub mod simulation;
