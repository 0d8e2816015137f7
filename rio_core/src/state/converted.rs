//! Physical quantities derived from the raw buffers.

/// Encoder position of the current cycle and the one latched by the last
/// interlock check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncoderPositions {
    pub current: Vec<f64>,
    pub previous: Vec<f64>,
}

impl EncoderPositions {
    pub fn new(n: usize) -> Self {
        Self {
            current: vec![0.0; n],
            previous: vec![0.0; n],
        }
    }

    /// `previous ← current`.
    pub fn latch(&mut self) {
        self.previous.copy_from_slice(&self.current);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertedState {
    pub encoder_position: EncoderPositions,
    /// Combined estimate, see [`crate::convert::velocity`].
    pub encoder_velocity: Vec<f64>,
    pub encoder_velocity_counter: Vec<f64>,
    pub encoder_velocity_derivative: Vec<f64>,
    pub joint_position: Vec<f64>,
    pub joint_velocity: Vec<f64>,
    pub pot_voltage: Vec<f64>,
    pub pot_position: Vec<f64>,
    pub actuator_current_feedback: Vec<f64>,
    pub actuator_effort_feedback: Vec<f64>,
    pub brake_current_feedback: Vec<f64>,
}

impl ConvertedState {
    pub fn new(actuators: usize, joints: usize, brakes: usize) -> Self {
        Self {
            encoder_position: EncoderPositions::new(actuators),
            encoder_velocity: vec![0.0; actuators],
            encoder_velocity_counter: vec![0.0; actuators],
            encoder_velocity_derivative: vec![0.0; actuators],
            joint_position: vec![0.0; joints],
            joint_velocity: vec![0.0; joints],
            pot_voltage: vec![0.0; actuators],
            pot_position: vec![0.0; actuators],
            actuator_current_feedback: vec![0.0; actuators],
            actuator_effort_feedback: vec![0.0; actuators],
            brake_current_feedback: vec![0.0; brakes],
        }
    }
}
