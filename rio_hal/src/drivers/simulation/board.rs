//! In-memory amplifier board.

use parking_lot::Mutex;
use rio_common::consts::AXES_PER_BOARD;
use rio_common::robot::board::{AxisMask, Board, BoardHandle, BoardId};
use std::sync::Arc;
use tracing::trace;

/// Mutating call recorded by a [`SimBoard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    WriteSafetyRelay(bool),
    WritePowerEnable(bool),
    WriteAmpEnable { mask: AxisMask, value: AxisMask },
    WriteWatchdogPeriod(u32),
    WriteEncoderPreload { axis: usize, bits: i32 },
    SetSafetyRelay(bool),
    SetAmpEnable { axis: usize, enabled: bool },
    SetMotorCurrent { axis: usize, bits: u32 },
}

/// Registers of one simulated axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimAxis {
    /// Raw 24-bit encoder counter (upper byte ignored by the core).
    pub encoder_position: u32,
    pub velocity_latched: u32,
    pub velocity_now: u32,
    pub analog_input: u32,
    /// Current feedback A/D value.
    pub motor_current: u32,
    /// Last commanded current bits.
    pub current_command: u32,
    pub amp_enable: bool,
    pub amp_status: bool,
}

/// Simulated board with [`AXES_PER_BOARD`] axes.
#[derive(Debug, Clone)]
pub struct SimBoard {
    id: BoardId,
    firmware: u32,
    pub valid: bool,
    pub power: bool,
    pub relay: bool,
    pub watchdog_timeout: bool,
    pub safety_amp_disable: AxisMask,
    /// Ticks since previous read.
    pub timestamp: u32,
    pub digital_input: u32,
    /// Half degrees Celsius, one per axis pair.
    pub temperatures: [u32; AXES_PER_BOARD / 2],
    pub watchdog_period: u32,
    pub axes: [SimAxis; AXES_PER_BOARD],
    /// Mirror commanded current bits into the feedback register.
    pub current_loopback: bool,
    /// Make every write return `false`.
    pub reject_writes: bool,
    calls: Vec<BoardCall>,
}

impl SimBoard {
    /// Healthy board: valid reads, power off, watchdog ok, firmware 4.
    pub fn new(id: BoardId) -> Self {
        Self {
            id,
            firmware: 4,
            valid: true,
            power: false,
            relay: false,
            watchdog_timeout: false,
            safety_amp_disable: AxisMask::empty(),
            timestamp: 0,
            digital_input: 0,
            temperatures: [0; AXES_PER_BOARD / 2],
            watchdog_period: 0,
            axes: [SimAxis::default(); AXES_PER_BOARD],
            current_loopback: false,
            reject_writes: false,
            calls: Vec::new(),
        }
    }

    pub fn with_firmware(mut self, firmware: u32) -> Self {
        self.firmware = firmware;
        self
    }

    pub fn with_current_loopback(mut self) -> Self {
        self.current_loopback = true;
        self
    }

    /// Wrap into a shared handle, keeping a typed clone for inspection.
    pub fn shared(self) -> (Arc<Mutex<SimBoard>>, BoardHandle) {
        let typed = Arc::new(Mutex::new(self));
        let handle: BoardHandle = typed.clone();
        (typed, handle)
    }

    /// Mutating calls recorded so far, oldest first.
    pub fn calls(&self) -> &[BoardCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Encode a signed encoder count into the 24-bit register layout.
    pub fn set_encoder_count(&mut self, axis: usize, count: i32) {
        if let Some(a) = self.axes.get_mut(axis) {
            a.encoder_position = (count as u32) & 0x00ff_ffff;
        }
    }

    /// Encode signed latched/now velocity counters into their 16-bit fields.
    pub fn set_velocity_ticks(&mut self, axis: usize, latched: i16, now: i16) {
        if let Some(a) = self.axes.get_mut(axis) {
            a.velocity_latched = latched as u16 as u32;
            a.velocity_now = now as u16 as u32;
        }
    }

    fn record(&mut self, call: BoardCall) -> bool {
        trace!(board = self.id, ?call, "sim board call");
        self.calls.push(call);
        !self.reject_writes
    }
}

impl Board for SimBoard {
    fn board_id(&self) -> BoardId {
        self.id
    }

    fn valid_read(&self) -> bool {
        self.valid
    }

    fn power_status(&self) -> bool {
        self.power
    }

    fn safety_relay_status(&self) -> bool {
        self.relay
    }

    fn watchdog_timeout_status(&self) -> bool {
        self.watchdog_timeout
    }

    fn safety_amp_disable(&self) -> AxisMask {
        self.safety_amp_disable
    }

    fn firmware_version(&self) -> u32 {
        self.firmware
    }

    fn write_safety_relay(&mut self, enabled: bool) -> bool {
        let accepted = self.record(BoardCall::WriteSafetyRelay(enabled));
        if accepted {
            self.relay = enabled;
        }
        accepted
    }

    fn write_power_enable(&mut self, enabled: bool) -> bool {
        let accepted = self.record(BoardCall::WritePowerEnable(enabled));
        if accepted {
            self.power = enabled;
            if !enabled {
                for axis in &mut self.axes {
                    axis.amp_status = false;
                }
            }
        }
        accepted
    }

    fn write_amp_enable(&mut self, mask: AxisMask, value: AxisMask) -> bool {
        let accepted = self.record(BoardCall::WriteAmpEnable { mask, value });
        if accepted {
            let power = self.power;
            for (index, axis) in self.axes.iter_mut().enumerate() {
                let bit = AxisMask::axis(index);
                if mask.contains(bit) {
                    axis.amp_enable = value.contains(bit);
                    axis.amp_status = axis.amp_enable && power;
                }
            }
        }
        accepted
    }

    fn write_watchdog_period(&mut self, counts: u32) -> bool {
        let accepted = self.record(BoardCall::WriteWatchdogPeriod(counts));
        if accepted {
            self.watchdog_period = counts;
        }
        accepted
    }

    fn write_encoder_preload(&mut self, axis: usize, bits: i32) -> bool {
        let accepted = self.record(BoardCall::WriteEncoderPreload { axis, bits });
        if accepted && axis < AXES_PER_BOARD {
            self.set_encoder_count(axis, bits);
        }
        accepted && axis < AXES_PER_BOARD
    }

    fn set_safety_relay(&mut self, enabled: bool) {
        self.record(BoardCall::SetSafetyRelay(enabled));
        self.relay = enabled;
    }

    fn timestamp(&self) -> u32 {
        self.timestamp
    }

    fn digital_input(&self) -> u32 {
        self.digital_input
    }

    fn encoder_position(&self, axis: usize) -> u32 {
        self.axes.get(axis).map_or(0, |a| a.encoder_position)
    }

    fn encoder_velocity(&self, axis: usize, latched: bool) -> u32 {
        self.axes.get(axis).map_or(0, |a| {
            if latched {
                a.velocity_latched
            } else {
                a.velocity_now
            }
        })
    }

    fn analog_input(&self, axis: usize) -> u32 {
        self.axes.get(axis).map_or(0, |a| a.analog_input)
    }

    fn motor_current(&self, axis: usize) -> u32 {
        self.axes.get(axis).map_or(0, |a| a.motor_current)
    }

    fn amp_enable(&self, axis: usize) -> bool {
        self.axes.get(axis).is_some_and(|a| a.amp_enable)
    }

    fn amp_status(&self, axis: usize) -> bool {
        self.axes.get(axis).is_some_and(|a| a.amp_status)
    }

    fn amp_temperature(&self, index: usize) -> u32 {
        self.temperatures.get(index).copied().unwrap_or(0)
    }

    fn set_amp_enable(&mut self, axis: usize, enabled: bool) -> bool {
        let accepted = self.record(BoardCall::SetAmpEnable { axis, enabled });
        let power = self.power;
        match self.axes.get_mut(axis) {
            Some(a) if accepted => {
                a.amp_enable = enabled;
                a.amp_status = enabled && power;
                true
            }
            _ => false,
        }
    }

    fn set_motor_current(&mut self, axis: usize, bits: u32) -> bool {
        let accepted = self.record(BoardCall::SetMotorCurrent { axis, bits });
        let loopback = self.current_loopback;
        match self.axes.get_mut(axis) {
            Some(a) if accepted => {
                a.current_command = bits;
                if loopback {
                    a.motor_current = bits;
                }
                true
            }
            _ => false,
        }
    }
}
