//! Integration test: current safety interlock.
//!
//! Validates:
//! 1. Consecutive over-current cycles are debounced and a clean cycle resets
//! 2. Exceeding the maximum cuts power and reports a fatal error
//! 3. A board-level safety amp-disable is fatal regardless of the counter

use rio_common::robot::board::AxisMask;
use rio_common::robot::error::RobotError;
use rio_core::Robot;
use rio_hal::{BoardCall, SimRack};

use super::common::{bound_robot, robot_config};

const MAX_VIOLATIONS: usize = 5;

// ── Helpers ─────────────────────────────────────────────────────────

fn powered_rack(ids: &[u8]) -> SimRack {
    let rack = SimRack::new(ids);
    rack.for_each(|b| {
        b.power = true;
        b.relay = true;
        b.timestamp = 49_125;
    });
    rack
}

/// Feedback of actuator 1: 2.0 A, above the 1.85 A feedback limit.
fn over_current(rack: &SimRack, on: bool) {
    rack.board(0).lock().axes[1].motor_current = if on { 2000 } else { 100 };
}

fn cycles(robot: &mut Robot, n: usize) {
    for _ in 0..n {
        robot.read_cycle().unwrap();
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn maximum_violations_are_tolerated_then_reset() {
    let rack = powered_rack(&[0]);
    let mut robot = bound_robot(&rack, robot_config(4, &[]), MAX_VIOLATIONS);

    over_current(&rack, true);
    cycles(&mut robot, MAX_VIOLATIONS);
    assert_eq!(robot.consecutive_current_violations(), MAX_VIOLATIONS);

    over_current(&rack, false);
    cycles(&mut robot, 1);
    assert_eq!(robot.consecutive_current_violations(), 0);

    // counting starts over
    over_current(&rack, true);
    cycles(&mut robot, MAX_VIOLATIONS);
    assert!(rack.board(0).lock().power);
}

#[test]
fn one_more_violation_disables_power() {
    let rack = powered_rack(&[0]);
    let mut robot = bound_robot(&rack, robot_config(4, &[]), MAX_VIOLATIONS);
    robot.enable_power().unwrap();
    rack.board(0).lock().clear_calls();

    over_current(&rack, true);
    cycles(&mut robot, MAX_VIOLATIONS);
    let err = robot.read_cycle().unwrap_err();

    assert!(err.is_fatal());
    assert!(err.power_disabled());
    assert!(matches!(
        err,
        RobotError::SafetyViolation {
            consecutive: 6,
            maximum: MAX_VIOLATIONS,
            ..
        }
    ));
    assert!(err.to_string().contains("psm1"));

    let board = rack.board(0).lock();
    assert_eq!(
        board.calls(),
        &[
            BoardCall::WriteAmpEnable {
                mask: AxisMask::all(),
                value: AxisMask::empty()
            },
            BoardCall::WritePowerEnable(false),
            BoardCall::WriteSafetyRelay(false),
        ]
    );
    assert!(!board.power);
    assert!(!board.relay);
    assert!(board.axes.iter().all(|a| !a.amp_enable));
}

#[test]
fn brake_over_current_counts_as_violation() {
    let rack = powered_rack(&[0]);
    let mut robot = bound_robot(&rack, robot_config(2, &[0]), 0);
    // brake on slot 2, feedback limit 0.65 A
    rack.board(0).lock().axes[2].motor_current = 700;
    assert!(robot.read_cycle().unwrap_err().power_disabled());
}

#[test]
fn re_enable_after_trip_restarts_count() {
    let rack = powered_rack(&[0]);
    let mut robot = bound_robot(&rack, robot_config(4, &[]), 1);
    over_current(&rack, true);
    cycles(&mut robot, 1);
    assert!(robot.read_cycle().is_err());

    robot.enable_power().unwrap();
    assert_eq!(robot.consecutive_current_violations(), 0);
    assert!(rack.board(0).lock().power);
    cycles(&mut robot, 1);
}

#[test]
fn hardware_amp_disable_is_fatal_immediately() {
    let rack = powered_rack(&[0, 1]);
    let mut robot = bound_robot(&rack, robot_config(8, &[]), 100);
    cycles(&mut robot, 3);

    rack.board(1).lock().safety_amp_disable = AxisMask::AXIS_2;
    let err = robot.read_cycle().unwrap_err();
    match &err {
        RobotError::HardwareFault {
            robot,
            boards,
            timestamps,
        } => {
            assert_eq!(robot, "psm1");
            assert_eq!(boards.as_slice(), &[1]);
            assert_eq!(timestamps.len(), 8);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.is_fatal());
    assert!(!err.power_disabled());
    assert_eq!(robot.consecutive_current_violations(), 0);
}

#[test]
fn hardware_fault_with_pending_violations() {
    let rack = powered_rack(&[0, 1]);
    let mut robot = bound_robot(&rack, robot_config(8, &[]), MAX_VIOLATIONS);
    over_current(&rack, true);
    cycles(&mut robot, MAX_VIOLATIONS - 2);
    assert_eq!(robot.consecutive_current_violations(), MAX_VIOLATIONS - 2);

    rack.board(1).lock().safety_amp_disable = AxisMask::AXIS_1;
    let err = robot.read_cycle().unwrap_err();
    assert!(matches!(
        &err,
        RobotError::HardwareFault { boards, .. } if boards.as_slice() == [1]
    ));
    assert!(!err.power_disabled());
    // counter is untouched by the hardware path
    assert_eq!(robot.consecutive_current_violations(), MAX_VIOLATIONS - 1);
    rack.for_each(|b| assert!(!b.calls().contains(&BoardCall::WritePowerEnable(false))));
}

#[test]
fn software_trip_wins_over_hardware_fault() {
    let rack = powered_rack(&[0]);
    let mut robot = bound_robot(&rack, robot_config(4, &[]), 0);
    rack.board(0).lock().safety_amp_disable = AxisMask::AXIS_1;
    over_current(&rack, true);
    assert!(robot.read_cycle().unwrap_err().power_disabled());
}
