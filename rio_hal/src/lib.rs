//! # RIO HAL Library
//!
//! Board-side implementations of the [`Board`](rio_common::robot::board::Board)
//! interface.
//!
//! # Module Structure
//!
//! - [`drivers`] - Board implementations
//!   - [`drivers::simulation`] - In-memory boards with a recorded call log
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     rio_core::Robot                      │
//! │   poll → convert → check → command                       │
//! └───────────────┬──────────────────────────────────────────┘
//!                 │ BoardHandle (Arc<Mutex<dyn Board>>)
//!                 ▼
//!        ┌──────────────────┐      ┌──────────────────┐
//!        │ SimBoard (id 0)  │ ...  │ SimBoard (id N)  │
//!        │ 4 axes, call log │      │ 4 axes, call log │
//!        └──────────────────┘      └──────────────────┘
//! ```

pub mod drivers;

pub use crate::drivers::simulation::{BoardCall, SimAxis, SimBoard, SimRack};
