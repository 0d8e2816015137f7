//! Robot configuration schema.
//!
//! This module contains the parsed description of one robot as consumed by
//! the core:
//! - `RobotConfig` - Counts, potentiometer mounting and kinematic mapping
//! - `ActuatorConfig` - Per-actuator drive, encoder and potentiometer coefficients
//! - `BrakeConfig` - Optional brake drive and current profile
//!
//! Parsing from XML/JSON/etc. belongs to the embedding application; the
//! serde derives let it use [`ConfigLoader`](crate::config::ConfigLoader) for
//! TOML out of the box.

use crate::robot::error::RobotError;
use serde::{Deserialize, Serialize};

/// Kind of joint driven by an actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JointType {
    #[default]
    Revolute,
    Prismatic,
}

/// Where potentiometers are physically mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PotLocation {
    /// Unknown mounting; pot-based calibration is unavailable.
    #[default]
    Undefined,
    /// Potentiometers measure joint output positions.
    Joints,
    /// Potentiometers measure actuator positions directly.
    Actuators,
}

/// Amplifier drive coefficients (shared by actuators and brakes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DriveConfig {
    /// Effort [Nm or N] to current [A] scale.
    #[serde(default)]
    pub effort_to_current_scale: f64,
    pub current_to_bits_scale: f64,
    #[serde(default)]
    pub current_to_bits_offset: f64,
    pub bits_to_current_scale: f64,
    #[serde(default)]
    pub bits_to_current_offset: f64,
    /// Symmetric effort command limit.
    #[serde(default)]
    pub effort_command_limit: f64,
    /// Symmetric current command limit [A].
    pub current_command_limit: f64,
}

/// Quadrature encoder coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EncoderConfig {
    pub bits_to_position_scale: f64,
    #[serde(default)]
    pub bits_to_position_offset: f64,
    /// Position travelled per counter edge; numerator of the velocity estimate.
    #[serde(default)]
    pub bits_to_dposition_scale: f64,
    #[serde(default)]
    pub bits_to_dposition_offset: f64,
    #[serde(default)]
    pub bits_to_dtime_scale: f64,
    #[serde(default)]
    pub bits_to_dtime_offset: f64,
    #[serde(default)]
    pub bits_to_velocity_scale: f64,
    #[serde(default)]
    pub bits_to_velocity_offset: f64,
    #[serde(default)]
    pub counts_per_turn: u32,
}

/// Potentiometer coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PotConfig {
    #[serde(default)]
    pub bits_to_voltage_scale: f64,
    #[serde(default)]
    pub bits_to_voltage_offset: f64,
    #[serde(default)]
    pub voltage_to_position_scale: f64,
    #[serde(default)]
    pub voltage_to_position_offset: f64,
}

/// Analog brake attached to an actuator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrakeConfig {
    pub drive: DriveConfig,
    /// Current applied to release the brake [A].
    pub release_current: f64,
    /// How long the release current is held [s].
    #[serde(default)]
    pub release_time: f64,
    /// Holding current once released [A].
    pub released_current: f64,
    /// Current while engaged [A].
    #[serde(default)]
    pub engaged_current: f64,
}

/// Per-actuator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuatorConfig {
    #[serde(default)]
    pub joint_type: JointType,
    pub drive: DriveConfig,
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub pot: PotConfig,
    #[serde(default)]
    pub brake: Option<BrakeConfig>,
}

/// Row-major mapping matrix as written in configuration files.
pub type MatrixRows = Vec<Vec<f64>>;

/// Complete robot description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Robot name, used as prefix of every diagnostic.
    pub name: String,
    pub number_of_actuators: usize,
    pub number_of_joints: usize,
    #[serde(default)]
    pub pot_location: PotLocation,
    pub actuators: Vec<ActuatorConfig>,
    /// joints × actuators
    pub actuator_to_joint_position: MatrixRows,
    /// actuators × joints
    pub joint_to_actuator_position: MatrixRows,
    /// joints × actuators
    pub actuator_to_joint_effort: MatrixRows,
    /// actuators × joints
    pub joint_to_actuator_effort: MatrixRows,
}

impl RobotConfig {
    /// Number of actuators carrying a brake descriptor.
    pub fn number_of_brakes(&self) -> usize {
        self.actuators.iter().filter(|a| a.brake.is_some()).count()
    }

    /// Validate the robot description.
    ///
    /// # Validation Rules
    /// 1. `name` not empty
    /// 2. `actuators.len() == number_of_actuators`
    /// 3. Every mapping matrix is rectangular with the documented shape
    /// 4. `bits_to_position_scale != 0` for every actuator
    /// 5. Every coefficient is finite; command limits are also non-negative
    pub fn validate(&self) -> Result<(), RobotError> {
        if self.name.is_empty() {
            return Err(RobotError::configuration("<unnamed>", "robot name is empty"));
        }

        if self.actuators.len() != self.number_of_actuators {
            return Err(RobotError::configuration(
                &self.name,
                format!(
                    "{} actuator descriptions for {} actuators",
                    self.actuators.len(),
                    self.number_of_actuators
                ),
            ));
        }

        let (joints, actuators) = (self.number_of_joints, self.number_of_actuators);
        for (label, rows, expected) in [
            ("actuator_to_joint_position", &self.actuator_to_joint_position, (joints, actuators)),
            ("joint_to_actuator_position", &self.joint_to_actuator_position, (actuators, joints)),
            ("actuator_to_joint_effort", &self.actuator_to_joint_effort, (joints, actuators)),
            ("joint_to_actuator_effort", &self.joint_to_actuator_effort, (actuators, joints)),
        ] {
            check_shape(&self.name, label, rows, expected)?;
        }

        if let Some(index) = self
            .actuators
            .iter()
            .position(|a| a.encoder.bits_to_position_scale == 0.0)
        {
            return Err(RobotError::configuration(
                &self.name,
                format!("actuator {index}: bits_to_position_scale must be non-zero"),
            ));
        }

        for (index, actuator) in self.actuators.iter().enumerate() {
            let label = format!("actuator {index}");
            check_drive(&self.name, &label, &actuator.drive)?;
            let e = &actuator.encoder;
            let p = &actuator.pot;
            check_finite(
                &self.name,
                &label,
                &[
                    ("bits_to_position_scale", e.bits_to_position_scale),
                    ("bits_to_position_offset", e.bits_to_position_offset),
                    ("bits_to_dposition_scale", e.bits_to_dposition_scale),
                    ("bits_to_dposition_offset", e.bits_to_dposition_offset),
                    ("bits_to_dtime_scale", e.bits_to_dtime_scale),
                    ("bits_to_dtime_offset", e.bits_to_dtime_offset),
                    ("bits_to_velocity_scale", e.bits_to_velocity_scale),
                    ("bits_to_velocity_offset", e.bits_to_velocity_offset),
                    ("bits_to_voltage_scale", p.bits_to_voltage_scale),
                    ("bits_to_voltage_offset", p.bits_to_voltage_offset),
                    ("voltage_to_position_scale", p.voltage_to_position_scale),
                    ("voltage_to_position_offset", p.voltage_to_position_offset),
                ],
            )?;
            if let Some(brake) = &actuator.brake {
                let label = format!("actuator {index} brake");
                check_drive(&self.name, &label, &brake.drive)?;
                check_finite(
                    &self.name,
                    &label,
                    &[
                        ("release_current", brake.release_current),
                        ("release_time", brake.release_time),
                        ("released_current", brake.released_current),
                        ("engaged_current", brake.engaged_current),
                    ],
                )?;
            }
        }

        for (label, rows) in [
            ("actuator_to_joint_position", &self.actuator_to_joint_position),
            ("joint_to_actuator_position", &self.joint_to_actuator_position),
            ("actuator_to_joint_effort", &self.actuator_to_joint_effort),
            ("joint_to_actuator_effort", &self.joint_to_actuator_effort),
        ] {
            if rows.iter().flatten().any(|v| !v.is_finite()) {
                return Err(RobotError::configuration(
                    &self.name,
                    format!("{label}: entries must be finite"),
                ));
            }
        }

        Ok(())
    }
}

/// Finite coefficients and finite, non-negative command limits.
fn check_drive(robot: &str, label: &str, drive: &DriveConfig) -> Result<(), RobotError> {
    check_finite(
        robot,
        label,
        &[
            ("effort_to_current_scale", drive.effort_to_current_scale),
            ("current_to_bits_scale", drive.current_to_bits_scale),
            ("current_to_bits_offset", drive.current_to_bits_offset),
            ("bits_to_current_scale", drive.bits_to_current_scale),
            ("bits_to_current_offset", drive.bits_to_current_offset),
            ("effort_command_limit", drive.effort_command_limit),
            ("current_command_limit", drive.current_command_limit),
        ],
    )?;
    for (field, limit) in [
        ("effort_command_limit", drive.effort_command_limit),
        ("current_command_limit", drive.current_command_limit),
    ] {
        if limit < 0.0 {
            return Err(RobotError::configuration(
                robot,
                format!("{label}: {field} must be non-negative, got {limit}"),
            ));
        }
    }
    Ok(())
}

fn check_finite(robot: &str, label: &str, fields: &[(&str, f64)]) -> Result<(), RobotError> {
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some((field, value)) => Err(RobotError::configuration(
            robot,
            format!("{label}: {field} must be finite, got {value}"),
        )),
        None => Ok(()),
    }
}

fn check_shape(
    robot: &str,
    label: &str,
    rows: &MatrixRows,
    (nrows, ncols): (usize, usize),
) -> Result<(), RobotError> {
    if rows.len() != nrows {
        return Err(RobotError::configuration(
            robot,
            format!("{label}: {} rows, expected {nrows}", rows.len()),
        ));
    }
    if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != ncols) {
        return Err(RobotError::configuration(
            robot,
            format!("{label}: row {r} has {} columns, expected {ncols}", row.len()),
        ));
    }
    Ok(())
}
