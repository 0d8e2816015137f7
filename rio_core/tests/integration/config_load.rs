//! Integration test: robot built from a TOML file.

use std::io::Write;

use rio_common::prelude::*;
use rio_core::Robot;
use rio_hal::SimRack;
use tempfile::NamedTempFile;

const TWO_AXIS: &str = r#"
[shared]
log_level = "debug"
service_name = "rio-bringup"

[safety]
max_consecutive_current_violations = 3
watchdog_period_s = 0.02

[robot]
name = "mtm"
number_of_actuators = 2
number_of_joints = 2
actuator_to_joint_position = [[1.0, 0.0], [0.0, 1.0]]
joint_to_actuator_position = [[1.0, 0.0], [0.0, 1.0]]
actuator_to_joint_effort = [[1.0, 0.0], [0.0, 1.0]]
joint_to_actuator_effort = [[1.0, 0.0], [0.0, 1.0]]

[[robot.actuators]]
joint_type = "revolute"
drive = { effort_to_current_scale = 1.0, current_to_bits_scale = 1000.0, current_to_bits_offset = 32768.0, bits_to_current_scale = 0.001, bits_to_current_offset = -32.768, effort_command_limit = 1.0, current_command_limit = 1.0 }
encoder = { bits_to_position_scale = 0.5 }

[robot.actuators.brake]
release_current = 0.3
released_current = 0.1
drive = { current_to_bits_scale = 1000.0, current_to_bits_offset = 32768.0, bits_to_current_scale = 0.001, bits_to_current_offset = -32.768, current_command_limit = 0.5 }

[[robot.actuators]]
joint_type = "prismatic"
drive = { effort_to_current_scale = 1.0, current_to_bits_scale = 1000.0, current_to_bits_offset = 32768.0, bits_to_current_scale = 0.001, bits_to_current_offset = -32.768, effort_command_limit = 1.0, current_command_limit = 1.0 }
encoder = { bits_to_position_scale = 0.5 }
"#;

fn load(text: &str) -> RioConfig {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    let config = RioConfig::load(file.path()).unwrap();
    config.validate().unwrap();
    config
}

#[test]
fn file_to_running_robot() {
    let config = load(TWO_AXIS);
    init_tracing(config.shared.log_level, false);

    let mut robot = Robot::from_config(&config).unwrap();
    assert_eq!(robot.name(), "mtm");
    assert_eq!(robot.joint_types(), &[JointType::Revolute, JointType::Prismatic]);
    assert_eq!(robot.number_of_brakes(), 1);
    assert_eq!(robot.safety().violations.maximum(), 3);

    let rack = SimRack::new(&[2]);
    rack.for_each(|b| {
        b.timestamp = 49_125;
        // zero current sits at mid-scale
        for axis in &mut b.axes {
            axis.motor_current = 32_768;
        }
    });
    robot
        .bind(rack.bindings(0, 2), rack.bindings(2, 1))
        .unwrap();
    robot
        .set_watchdog_period(config.safety.watchdog_period_s)
        .unwrap();
    assert_eq!(rack.board(0).lock().watchdog_period, 3840);

    robot.read_cycle().unwrap();
    assert!(robot.actuator_current_feedback().iter().all(|c| c.abs() < 1e-9));

    robot.set_actuator_current(&[1.0, -0.25]).unwrap();
    assert_eq!(robot.command().actuator_current_bits, vec![33_768, 32_518]);
}

#[test]
fn missing_file_is_reported() {
    let err = RioConfig::load(std::path::Path::new("/nonexistent/rio.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound));
}

#[test]
fn inconsistent_robot_fails_validation() {
    let text = TWO_AXIS.replace("number_of_actuators = 2", "number_of_actuators = 3");
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    let config = RioConfig::load(file.path()).unwrap();
    assert!(config.validate().is_err());
    assert!(Robot::from_config(&config).is_err());
}

#[test]
fn non_finite_current_limit_fails_validation() {
    let text = TWO_AXIS.replacen("current_command_limit = 1.0", "current_command_limit = nan", 1);
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    let config = RioConfig::load(file.path()).unwrap();
    assert!(config.robot.actuators[0].drive.current_command_limit.is_nan());
    assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    assert!(matches!(
        Robot::from_config(&config),
        Err(RobotError::Configuration { .. })
    ));
}
