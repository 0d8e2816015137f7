//! Shared fixtures.

use rio_common::prelude::*;
use rio_core::Robot;
use rio_hal::SimRack;

pub const CURRENT_LIMIT: f64 = 1.5;

pub fn drive(limit: f64) -> DriveConfig {
    DriveConfig {
        effort_to_current_scale: 0.5,
        current_to_bits_scale: 1000.0,
        current_to_bits_offset: 0.0,
        bits_to_current_scale: 0.001,
        bits_to_current_offset: 0.0,
        effort_command_limit: 2.0 * limit,
        current_command_limit: limit,
    }
}

pub fn actuator(brake: bool) -> ActuatorConfig {
    ActuatorConfig {
        joint_type: JointType::Revolute,
        drive: drive(CURRENT_LIMIT),
        encoder: EncoderConfig {
            bits_to_position_scale: 1.0,
            bits_to_dposition_scale: 1.0,
            counts_per_turn: 4000,
            ..Default::default()
        },
        pot: PotConfig {
            bits_to_voltage_scale: 0.25,
            bits_to_voltage_offset: 0.0,
            voltage_to_position_scale: 4.0,
            voltage_to_position_offset: 0.0,
        },
        brake: brake.then(|| BrakeConfig {
            drive: drive(0.5),
            release_current: 0.4,
            release_time: 0.25,
            released_current: 0.125,
            engaged_current: 0.0,
        }),
    }
}

pub fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|r| (0..n).map(|c| if r == c { 1.0 } else { 0.0 }).collect())
        .collect()
}

/// `n` identical actuators, identity kinematics, brakes on the listed actuators.
pub fn robot_config(n: usize, brakes: &[usize]) -> RobotConfig {
    RobotConfig {
        name: "psm1".to_string(),
        number_of_actuators: n,
        number_of_joints: n,
        pot_location: PotLocation::Undefined,
        actuators: (0..n).map(|i| actuator(brakes.contains(&i))).collect(),
        actuator_to_joint_position: identity(n),
        joint_to_actuator_position: identity(n),
        actuator_to_joint_effort: identity(n),
        joint_to_actuator_effort: identity(n),
    }
}

/// Robot bound to consecutive rack slots: actuators first, then brakes.
pub fn bound_robot(rack: &SimRack, config: RobotConfig, max_violations: usize) -> Robot {
    let (actuators, brakes) = (config.number_of_actuators, config.number_of_brakes());
    let mut robot = Robot::new(config, max_violations).unwrap();
    robot
        .bind(rack.bindings(0, actuators), rack.bindings(actuators, brakes))
        .unwrap();
    robot
}
