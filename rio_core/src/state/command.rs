//! Last dispatched commands. Recorded for telemetry, never read back as feedback.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandState {
    /// Clipped actuator current [A].
    pub actuator_current: Vec<f64>,
    pub actuator_current_bits: Vec<i32>,
    pub brake_current: Vec<f64>,
    pub brake_current_bits: Vec<i32>,
}

impl CommandState {
    pub fn new(actuators: usize, brakes: usize) -> Self {
        Self {
            actuator_current: vec![0.0; actuators],
            actuator_current_bits: vec![0; actuators],
            brake_current: vec![0.0; brakes],
            brake_current_bits: vec![0; brakes],
        }
    }
}
