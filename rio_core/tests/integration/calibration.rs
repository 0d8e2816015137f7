//! Integration test: potentiometer-based encoder offset calibration.

use rio_common::robot::config::PotLocation;
use rio_hal::SimRack;

use super::common::{bound_robot, robot_config};

/// Encoder counts and pot readings for two actuators on board 0.
fn set_inputs(rack: &SimRack, counts: [i32; 2], pot_bits: [u32; 2]) {
    let mut board = rack.board(0).lock();
    for axis in 0..2 {
        board.set_encoder_count(axis, counts[axis]);
        board.axes[axis].analog_input = pot_bits[axis];
    }
}

#[test]
fn pots_on_actuators_align_encoders() {
    let rack = SimRack::new(&[0]);
    let mut config = robot_config(2, &[]);
    config.pot_location = PotLocation::Actuators;
    let mut robot = bound_robot(&rack, config, 10);

    // pot position = bits × 0.25 V × 4.0
    set_inputs(&rack, [100, -40], [30, 12]);
    robot.poll_state().unwrap();
    robot.convert_state();
    assert_eq!(robot.pot_position(), &[30.0, 12.0]);

    assert!(robot.calibrate_encoder_offsets_from_pots());
    assert_eq!(robot.calibration().encoder().bits_to_position_offsets, vec![-70.0, 52.0]);

    robot.convert_state();
    assert_eq!(robot.encoder_position(), robot.pot_position());
}

#[test]
fn pots_on_joints_align_joint_positions() {
    let rack = SimRack::new(&[0]);
    let mut config = robot_config(2, &[]);
    config.pot_location = PotLocation::Joints;
    // joint 1 follows the sum of both actuators
    config.actuator_to_joint_position = vec![vec![1.0, 0.0], vec![1.0, 1.0]];
    config.joint_to_actuator_position = vec![vec![1.0, 0.0], vec![-1.0, 1.0]];
    let mut robot = bound_robot(&rack, config, 10);

    set_inputs(&rack, [10, 20], [8, 40]);
    robot.poll_state().unwrap();
    robot.convert_state();
    assert_eq!(robot.joint_position(), &[10.0, 30.0]);

    assert!(robot.calibrate_encoder_offsets_from_pots());
    robot.convert_state();
    assert_eq!(robot.joint_position(), &[8.0, 40.0]);
}

#[test]
fn undefined_pot_location_is_a_no_op() {
    let rack = SimRack::new(&[0]);
    let mut robot = bound_robot(&rack, robot_config(2, &[]), 10);
    set_inputs(&rack, [100, 100], [1, 1]);
    robot.poll_state().unwrap();
    robot.convert_state();

    assert!(!robot.calibrate_encoder_offsets_from_pots());
    robot.convert_state();
    assert_eq!(robot.encoder_position(), &[100.0, 100.0]);
}
