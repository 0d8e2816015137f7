//! Raw register buffers, overwritten wholesale by every poll.

use rio_common::consts::BOARD_CLOCK_HZ;
use rio_common::robot::board::AxisBinding;

use crate::convert::velocity::sign_extend_24;

/// Latched registers of every actuator axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActuatorRaw {
    /// Time since the previous board read [s].
    pub timestamp_s: Vec<f64>,
    pub digital_inputs: Vec<u32>,
    /// Sign-extended 24-bit counter.
    pub encoder_position_bits: Vec<i32>,
    pub encoder_velocity_latched: Vec<u32>,
    pub encoder_velocity_now: Vec<u32>,
    pub pot_bits: Vec<i32>,
    pub current_bits: Vec<i32>,
    pub amp_enable: Vec<bool>,
    pub amp_status: Vec<bool>,
    /// [°C]
    pub temperature: Vec<f64>,
}

impl ActuatorRaw {
    fn with_len(n: usize) -> Self {
        Self {
            timestamp_s: vec![0.0; n],
            digital_inputs: vec![0; n],
            encoder_position_bits: vec![0; n],
            encoder_velocity_latched: vec![0; n],
            encoder_velocity_now: vec![0; n],
            pot_bits: vec![0; n],
            current_bits: vec![0; n],
            amp_enable: vec![false; n],
            amp_status: vec![false; n],
            temperature: vec![0.0; n],
        }
    }

    fn poll(&mut self, bindings: &[AxisBinding]) {
        for (i, binding) in bindings.iter().enumerate().take(self.timestamp_s.len()) {
            let axis = binding.axis;
            let board = binding.board.lock();
            self.timestamp_s[i] = f64::from(board.timestamp()) / BOARD_CLOCK_HZ;
            self.digital_inputs[i] = board.digital_input();
            self.encoder_position_bits[i] = sign_extend_24(board.encoder_position(axis));
            self.encoder_velocity_latched[i] = board.encoder_velocity(axis, true);
            self.encoder_velocity_now[i] = board.encoder_velocity(axis, false);
            self.pot_bits[i] = board.analog_input(axis) as i32;
            self.current_bits[i] = board.motor_current(axis) as i32;
            self.amp_enable[i] = board.amp_enable(axis);
            self.amp_status[i] = board.amp_status(axis);
            self.temperature[i] = f64::from(board.amp_temperature(axis / 2)) / 2.0;
        }
    }
}

/// Latched registers of every brake axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrakeRaw {
    pub timestamp_s: Vec<f64>,
    pub current_bits: Vec<i32>,
    pub amp_enable: Vec<bool>,
    pub amp_status: Vec<bool>,
    pub temperature: Vec<f64>,
}

impl BrakeRaw {
    fn with_len(n: usize) -> Self {
        Self {
            timestamp_s: vec![0.0; n],
            current_bits: vec![0; n],
            amp_enable: vec![false; n],
            amp_status: vec![false; n],
            temperature: vec![0.0; n],
        }
    }

    fn poll(&mut self, bindings: &[AxisBinding]) {
        for (i, binding) in bindings.iter().enumerate().take(self.timestamp_s.len()) {
            let axis = binding.axis;
            let board = binding.board.lock();
            self.timestamp_s[i] = f64::from(board.timestamp()) / BOARD_CLOCK_HZ;
            self.current_bits[i] = board.motor_current(axis) as i32;
            self.amp_enable[i] = board.amp_enable(axis);
            self.amp_status[i] = board.amp_status(axis);
            self.temperature[i] = f64::from(board.amp_temperature(axis / 2)) / 2.0;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawState {
    pub actuators: ActuatorRaw,
    pub brakes: BrakeRaw,
}

impl RawState {
    pub fn new(actuators: usize, brakes: usize) -> Self {
        Self {
            actuators: ActuatorRaw::with_len(actuators),
            brakes: BrakeRaw::with_len(brakes),
        }
    }

    /// Latch every bound axis. One board lock at a time.
    pub fn poll(&mut self, actuators: &[AxisBinding], brakes: &[AxisBinding]) {
        self.actuators.poll(actuators);
        self.brakes.poll(brakes);
    }
}
