//! Amplifier board interface and axis bindings.
//!
//! This module defines:
//! - `Board` trait - Register-level interface of one amplifier board
//! - `BoardHandle` type alias - Shared handle the core keeps per board
//! - `AxisMask` bitflags - Per-axis masks for amp-enable and fault registers
//! - `AxisBinding` struct - Actuator/brake index → (board, axis)
//!
//! The bus transport behind a board (block reads, write buffering,
//! reconnects) is the implementor's business. Getters return the values
//! latched by the most recent bus read; `set_*` calls are buffered until the
//! next bus write; `write_*` calls go out immediately.

use bitflags::bitflags;
use parking_lot::Mutex;
use std::sync::Arc;

/// Board identifier (rotary switch / node number).
pub type BoardId = u8;

bitflags! {
    /// One bit per board axis.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AxisMask: u32 {
        const AXIS_0 = 0x01;
        const AXIS_1 = 0x02;
        const AXIS_2 = 0x04;
        const AXIS_3 = 0x08;
    }
}

impl AxisMask {
    /// Mask with only `axis` set (empty if out of range).
    pub const fn axis(axis: usize) -> Self {
        if axis < 32 {
            Self::from_bits_truncate(1 << axis)
        } else {
            Self::empty()
        }
    }
}

/// Register-level interface of one amplifier board.
///
/// # Timing Contracts
///
/// | Operation | Blocking | Called from |
/// |-----------|----------|-------------|
/// | getters | no (latched values) | poll steps |
/// | `set_*` | no (buffered) | command steps |
/// | `write_*` | one bus transaction | power/watchdog/preload |
///
/// Write methods return `false` when the bus rejected the transaction.
pub trait Board: Send {
    /// Board identifier, unique on the bus.
    fn board_id(&self) -> BoardId;

    /// Whether the last block read succeeded.
    fn valid_read(&self) -> bool;

    /// Board power supply status.
    fn power_status(&self) -> bool;

    /// Safety relay status.
    fn safety_relay_status(&self) -> bool;

    /// Watchdog timeout status flag.
    fn watchdog_timeout_status(&self) -> bool;

    /// Axes whose amplifier was disabled by the hardware current interlock.
    fn safety_amp_disable(&self) -> AxisMask;

    /// FPGA firmware version.
    fn firmware_version(&self) -> u32;

    fn write_safety_relay(&mut self, enabled: bool) -> bool;

    fn write_power_enable(&mut self, enabled: bool) -> bool;

    /// Write amp-enable `value` for every axis selected by `mask`.
    fn write_amp_enable(&mut self, mask: AxisMask, value: AxisMask) -> bool;

    /// Watchdog period in counts; 0 disables the watchdog.
    fn write_watchdog_period(&mut self, counts: u32) -> bool;

    fn write_encoder_preload(&mut self, axis: usize, bits: i32) -> bool;

    /// Buffered safety relay request.
    fn set_safety_relay(&mut self, enabled: bool);

    /// Board clock ticks elapsed since the previous read.
    fn timestamp(&self) -> u32;

    fn digital_input(&self) -> u32;

    /// 24-bit encoder counter in the low bits of a 32-bit register.
    fn encoder_position(&self, axis: usize) -> u32;

    /// Velocity counter: `latched` = ticks between the last two edges,
    /// otherwise ticks since the last edge (still counting).
    fn encoder_velocity(&self, axis: usize, latched: bool) -> u32;

    /// Potentiometer A/D value.
    fn analog_input(&self, axis: usize) -> u32;

    /// Motor current feedback A/D value.
    fn motor_current(&self, axis: usize) -> u32;

    fn amp_enable(&self, axis: usize) -> bool;

    fn amp_status(&self, axis: usize) -> bool;

    /// Amplifier temperature in half degrees Celsius; one sensor per axis pair.
    fn amp_temperature(&self, index: usize) -> u32;

    fn set_amp_enable(&mut self, axis: usize, enabled: bool) -> bool;

    fn set_motor_current(&mut self, axis: usize, bits: u32) -> bool;
}

/// Shared handle to a board owned by the bus collaborator.
pub type BoardHandle = Arc<Mutex<dyn Board>>;

/// Binds one actuator or brake to an axis of a board.
#[derive(Clone)]
pub struct AxisBinding {
    pub board: BoardHandle,
    pub axis: usize,
}

impl AxisBinding {
    pub fn new(board: BoardHandle, axis: usize) -> Self {
        Self { board, axis }
    }

    /// Identifier of the bound board.
    pub fn board_id(&self) -> BoardId {
        self.board.lock().board_id()
    }
}

impl std::fmt::Debug for AxisBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxisBinding")
            .field("board", &self.board.try_lock().map(|b| b.board_id()))
            .field("axis", &self.axis)
            .finish()
    }
}
