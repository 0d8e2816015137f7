//! Simulation boards.
//!
//! [`SimBoard`] keeps every register in memory and records each mutating
//! call so tests can assert on write ordering. [`SimRack`] groups several
//! boards and hands out sequential axis bindings.

mod board;
mod rack;

pub use board::{BoardCall, SimAxis, SimBoard};
pub use rack::SimRack;
