//! Calibration model.
//!
//! Built once from a validated [`RobotConfig`]: every per-axis coefficient is
//! flattened into a struct-of-vectors so conversions walk contiguous slices.
//! Derived values (feedback limits, joint effort limits) are computed here and
//! nowhere else.

use nalgebra::DMatrix;
use rio_common::consts::feedback_current_limit;
use rio_common::robot::config::{DriveConfig, JointType, MatrixRows, PotLocation, RobotConfig};
use rio_common::robot::error::RobotError;

use crate::convert::mapping::map_into;

/// Drive coefficients for a set of amplifier axes (actuators or brakes).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriveCoefficients {
    pub effort_to_current_scales: Vec<f64>,
    pub current_to_bits_scales: Vec<f64>,
    pub current_to_bits_offsets: Vec<f64>,
    pub bits_to_current_scales: Vec<f64>,
    pub bits_to_current_offsets: Vec<f64>,
    pub effort_command_limits: Vec<f64>,
    pub current_command_limits: Vec<f64>,
    /// `1.2 × command + 0.05` A, derived.
    pub current_feedback_limits: Vec<f64>,
}

impl DriveCoefficients {
    fn from_drives<'a>(drives: impl Iterator<Item = &'a DriveConfig>) -> Self {
        let mut c = Self::default();
        for d in drives {
            c.effort_to_current_scales.push(d.effort_to_current_scale);
            c.current_to_bits_scales.push(d.current_to_bits_scale);
            c.current_to_bits_offsets.push(d.current_to_bits_offset);
            c.bits_to_current_scales.push(d.bits_to_current_scale);
            c.bits_to_current_offsets.push(d.bits_to_current_offset);
            c.effort_command_limits.push(d.effort_command_limit);
            c.current_command_limits.push(d.current_command_limit);
            c.current_feedback_limits
                .push(feedback_current_limit(d.current_command_limit));
        }
        c
    }

    /// Number of axes described.
    pub fn len(&self) -> usize {
        self.current_command_limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_command_limits.is_empty()
    }
}

/// Encoder coefficients per actuator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncoderCoefficients {
    pub bits_to_position_scales: Vec<f64>,
    pub bits_to_position_offsets: Vec<f64>,
    pub bits_to_dposition_scales: Vec<f64>,
    pub bits_to_dposition_offsets: Vec<f64>,
    pub bits_to_dtime_scales: Vec<f64>,
    pub bits_to_dtime_offsets: Vec<f64>,
    pub bits_to_velocity_scales: Vec<f64>,
    pub bits_to_velocity_offsets: Vec<f64>,
    pub counts_per_turn: Vec<u32>,
}

/// Potentiometer coefficients per actuator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PotCoefficients {
    pub bits_to_voltage_scales: Vec<f64>,
    pub bits_to_voltage_offsets: Vec<f64>,
    pub voltage_to_position_scales: Vec<f64>,
    pub voltage_to_position_offsets: Vec<f64>,
}

/// Brake current profile, one entry per brake.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrakeProfile {
    pub release_current: Vec<f64>,
    /// [s]
    pub release_time: Vec<f64>,
    pub released_current: Vec<f64>,
    pub engaged_current: Vec<f64>,
}

/// Linear maps between actuator and joint space.
#[derive(Debug, Clone, PartialEq)]
pub struct JointMapping {
    /// joints × actuators
    pub actuator_to_joint_position: DMatrix<f64>,
    /// actuators × joints
    pub joint_to_actuator_position: DMatrix<f64>,
    /// joints × actuators
    pub actuator_to_joint_effort: DMatrix<f64>,
    /// actuators × joints
    pub joint_to_actuator_effort: DMatrix<f64>,
}

/// Immutable per-robot calibration.
///
/// The only field that changes after construction is the encoder position
/// offset vector, adjusted by pot calibration and encoder preload.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    number_of_joints: usize,
    pot_location: PotLocation,
    joint_types: Vec<JointType>,
    actuator_drive: DriveCoefficients,
    encoder: EncoderCoefficients,
    pot: PotCoefficients,
    brake_drive: DriveCoefficients,
    brake_profile: BrakeProfile,
    brake_actuators: Vec<usize>,
    mapping: JointMapping,
    joint_effort_command_limits: Vec<f64>,
}

impl Calibration {
    /// Build the calibration from a robot description.
    ///
    /// # Errors
    /// [`RobotError::Configuration`] if the description fails validation.
    pub fn from_config(config: &RobotConfig) -> Result<Self, RobotError> {
        config.validate()?;

        let actuators = &config.actuators;
        let (n_act, n_joint) = (config.number_of_actuators, config.number_of_joints);

        let mut encoder = EncoderCoefficients::default();
        let mut pot = PotCoefficients::default();
        for a in actuators {
            let e = &a.encoder;
            encoder.bits_to_position_scales.push(e.bits_to_position_scale);
            encoder.bits_to_position_offsets.push(e.bits_to_position_offset);
            encoder.bits_to_dposition_scales.push(e.bits_to_dposition_scale);
            encoder.bits_to_dposition_offsets.push(e.bits_to_dposition_offset);
            encoder.bits_to_dtime_scales.push(e.bits_to_dtime_scale);
            encoder.bits_to_dtime_offsets.push(e.bits_to_dtime_offset);
            encoder.bits_to_velocity_scales.push(e.bits_to_velocity_scale);
            encoder.bits_to_velocity_offsets.push(e.bits_to_velocity_offset);
            encoder.counts_per_turn.push(e.counts_per_turn);

            pot.bits_to_voltage_scales.push(a.pot.bits_to_voltage_scale);
            pot.bits_to_voltage_offsets.push(a.pot.bits_to_voltage_offset);
            pot.voltage_to_position_scales.push(a.pot.voltage_to_position_scale);
            pot.voltage_to_position_offsets.push(a.pot.voltage_to_position_offset);
        }

        let brakes: Vec<_> = actuators
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.brake.as_ref().map(|b| (i, b)))
            .collect();
        let mut brake_profile = BrakeProfile::default();
        for (_, b) in &brakes {
            brake_profile.release_current.push(b.release_current);
            brake_profile.release_time.push(b.release_time);
            brake_profile.released_current.push(b.released_current);
            brake_profile.engaged_current.push(b.engaged_current);
        }

        let mapping = JointMapping {
            actuator_to_joint_position: matrix(&config.actuator_to_joint_position, n_joint, n_act),
            joint_to_actuator_position: matrix(&config.joint_to_actuator_position, n_act, n_joint),
            actuator_to_joint_effort: matrix(&config.actuator_to_joint_effort, n_joint, n_act),
            joint_to_actuator_effort: matrix(&config.joint_to_actuator_effort, n_act, n_joint),
        };

        let actuator_drive = DriveCoefficients::from_drives(actuators.iter().map(|a| &a.drive));
        let mut joint_effort_command_limits = vec![0.0; n_joint];
        map_into(
            &mapping.actuator_to_joint_effort,
            &actuator_drive.effort_command_limits,
            &mut joint_effort_command_limits,
        );

        Ok(Self {
            number_of_joints: n_joint,
            pot_location: config.pot_location,
            joint_types: actuators.iter().map(|a| a.joint_type).collect(),
            actuator_drive,
            encoder,
            pot,
            brake_drive: DriveCoefficients::from_drives(brakes.iter().map(|(_, b)| &b.drive)),
            brake_profile,
            brake_actuators: brakes.iter().map(|(i, _)| *i).collect(),
            mapping,
            joint_effort_command_limits,
        })
    }

    pub fn number_of_actuators(&self) -> usize {
        self.joint_types.len()
    }

    pub fn number_of_joints(&self) -> usize {
        self.number_of_joints
    }

    pub fn number_of_brakes(&self) -> usize {
        self.brake_actuators.len()
    }

    pub fn pot_location(&self) -> PotLocation {
        self.pot_location
    }

    /// Joint type of each actuator.
    pub fn joint_types(&self) -> &[JointType] {
        &self.joint_types
    }

    pub fn actuator_drive(&self) -> &DriveCoefficients {
        &self.actuator_drive
    }

    pub fn encoder(&self) -> &EncoderCoefficients {
        &self.encoder
    }

    pub fn pot(&self) -> &PotCoefficients {
        &self.pot
    }

    pub fn brake_drive(&self) -> &DriveCoefficients {
        &self.brake_drive
    }

    pub fn brake_profile(&self) -> &BrakeProfile {
        &self.brake_profile
    }

    /// Actuator index owning each brake.
    pub fn brake_actuators(&self) -> &[usize] {
        &self.brake_actuators
    }

    pub fn mapping(&self) -> &JointMapping {
        &self.mapping
    }

    /// Actuator effort limits mapped through the actuator→joint effort matrix.
    pub fn joint_effort_command_limits(&self) -> &[f64] {
        &self.joint_effort_command_limits
    }

    /// Subtract `correction` from the encoder position offsets.
    pub(crate) fn shift_position_offsets(&mut self, correction: &[f64]) {
        for (offset, c) in self
            .encoder
            .bits_to_position_offsets
            .iter_mut()
            .zip(correction)
        {
            *offset -= c;
        }
    }
}

/// Shapes are checked by `RobotConfig::validate` beforehand.
fn matrix(rows: &MatrixRows, nrows: usize, ncols: usize) -> DMatrix<f64> {
    DMatrix::from_fn(nrows, ncols, |r, c| rows[r][c])
}
