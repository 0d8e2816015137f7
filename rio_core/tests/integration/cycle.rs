//! Integration test: read half of the control cycle.
//!
//! validity → poll → convert → check against simulated boards, including
//! both velocity estimators and read failures.

use rio_common::consts::VELOCITY_SENTINEL;
use rio_common::robot::error::RobotError;
use rio_hal::{SimBoard, SimRack};

use super::common::{bound_robot, robot_config};

// ── Helpers ─────────────────────────────────────────────────────────

/// 1 ms between board reads.
const TICKS_PER_MS: u32 = 49_125;

fn healthy_rack(ids: &[u8]) -> SimRack {
    let rack = SimRack::new(ids);
    rack.for_each(|b| {
        b.power = true;
        b.relay = true;
        b.timestamp = TICKS_PER_MS;
    });
    rack
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn clean_cycle_converts_every_axis() {
    let rack = healthy_rack(&[0, 1]);
    {
        let mut board = rack.board(0).lock();
        board.set_encoder_count(0, 1000);
        board.set_encoder_count(3, -2000);
        board.axes[0].motor_current = 500;
        board.axes[0].analog_input = 8;
        board.temperatures = [70, 72];
    }
    rack.board(1).lock().set_encoder_count(1, 0x7f_ffff);

    let mut robot = bound_robot(&rack, robot_config(6, &[]), 10);
    robot.read_cycle().unwrap();

    assert!(robot.valid());
    assert!(robot.power_status());
    assert_eq!(robot.encoder_position()[..4], [1000.0, 0.0, 0.0, -2000.0]);
    assert_eq!(robot.encoder_position()[5], 8_388_607.0);
    assert_eq!(robot.joint_position(), robot.encoder_position());
    assert!((robot.actuator_current_feedback()[0] - 0.5).abs() < 1e-12);
    assert!((robot.actuator_effort_feedback()[0] - 1.0).abs() < 1e-12);
    assert_eq!(robot.pot_position()[0], 8.0);
    assert_eq!(robot.actuator_temperatures()[..4], [35.0, 35.0, 36.0, 36.0]);
    assert!((robot.actuator_timestamps()[0] - 0.001).abs() < 1e-12);
    // previous position latched by the interlock check
    assert_eq!(robot.encoder_position_previous(), robot.encoder_position());
}

#[test]
fn velocity_sentinel_reports_zero() {
    let rack = healthy_rack(&[0]);
    {
        let mut board = rack.board(0).lock();
        board.axes[0].velocity_latched = VELOCITY_SENTINEL;
        board.axes[0].velocity_now = 300;
        board.axes[1].velocity_latched = 300;
        board.axes[1].velocity_now = VELOCITY_SENTINEL;
        // moving fast: would otherwise take the derivative
        board.axes[2].velocity_latched = 20;
        board.axes[2].velocity_now = VELOCITY_SENTINEL;
        board.set_encoder_count(2, 500);
    }
    let mut robot = bound_robot(&rack, robot_config(3, &[]), 10);
    robot.read_cycle().unwrap();
    assert_eq!(robot.encoder_velocity(), &[0.0, 0.0, 0.0]);
}

#[test]
fn low_tick_counter_uses_position_derivative() {
    let rack = healthy_rack(&[0]);
    let mut robot = bound_robot(&rack, robot_config(2, &[]), 10);
    robot.read_cycle().unwrap();

    {
        let mut board = rack.board(0).lock();
        board.set_encoder_count(0, 50);
        board.set_velocity_ticks(0, 20, 20);
        board.set_encoder_count(1, 50);
        board.set_velocity_ticks(1, 400, 200);
    }
    robot.read_cycle().unwrap();

    let v = robot.encoder_velocity();
    // 50 counts in 1 ms
    assert!((v[0] - 50_000.0).abs() < 1e-6);
    // counter estimate: dposition scale / latched ticks
    assert_eq!(v[1], 1.0 / 400.0);
    assert_eq!(robot.joint_velocity(), v);
}

#[test]
fn slowing_axis_uses_running_counter_on_new_firmware() {
    for (firmware, expected_ticks) in [(4, 800.0), (3, 400.0)] {
        let rack = SimRack::from_boards([SimBoard::new(0).with_firmware(firmware)]);
        rack.for_each(|b| b.timestamp = TICKS_PER_MS);
        rack.board(0).lock().set_velocity_ticks(0, -400, -800);
        let mut robot = bound_robot(&rack, robot_config(1, &[]), 10);
        robot.read_cycle().unwrap();
        assert_eq!(robot.encoder_velocity(), &[-1.0 / expected_ticks]);
    }
}

#[test]
fn read_failure_names_every_bad_board() {
    let rack = healthy_rack(&[3, 4, 5]);
    rack.board(0).lock().valid = false;
    rack.board(2).lock().valid = false;
    rack.board(1).lock().set_encoder_count(0, 77);

    let mut robot = bound_robot(&rack, robot_config(12, &[]), 10);
    let err = robot.read_cycle().unwrap_err();
    assert!(!err.is_fatal());
    match &err {
        RobotError::ReadValidity { boards, .. } => assert_eq!(boards.as_slice(), &[3, 5]),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().starts_with("psm1:"));
    // cycle aborted before polling
    assert_eq!(robot.encoder_position()[4], 0.0);
    assert!(!robot.valid());
}

#[test]
fn power_loss_is_visible_next_cycle() {
    let rack = healthy_rack(&[0]);
    let mut robot = bound_robot(&rack, robot_config(1, &[]), 10);
    robot.read_cycle().unwrap();
    assert!(!robot.power_lost());

    rack.board(0).lock().power = false;
    robot.read_cycle().unwrap();
    assert!(robot.power_lost());
    assert!(robot.previous_power_status());

    robot.read_cycle().unwrap();
    assert!(!robot.power_lost());
}

#[test]
fn watchdog_trip_edge() {
    let rack = healthy_rack(&[0]);
    let mut robot = bound_robot(&rack, robot_config(1, &[]), 10);
    robot.read_cycle().unwrap();
    rack.board(0).lock().watchdog_timeout = true;
    robot.read_cycle().unwrap();
    assert!(robot.watchdog_timeout());
    assert!(robot.watchdog_tripped());
}
