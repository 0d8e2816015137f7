//! Integration test: power sequencing order across boards.
//!
//! Uses a recording board that appends every write to one log shared by all
//! boards, so ordering between boards is observable.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use rio_common::consts::POWER_SETTLE_DELAY;
use rio_common::robot::board::{AxisBinding, AxisMask, Board, BoardHandle, BoardId};
use rio_core::Robot;

use super::common::robot_config;

// ── Recording board ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Write {
    Relay(bool),
    Power(bool),
    AmpMask(AxisMask),
    Amp(usize, bool),
    Watchdog(u32),
    BufferedRelay(bool),
}

type Log = Arc<Mutex<Vec<(BoardId, Write, Instant)>>>;

struct RecordingBoard {
    id: BoardId,
    log: Log,
}

impl RecordingBoard {
    fn push(&self, write: Write) -> bool {
        self.log.lock().push((self.id, write, Instant::now()));
        true
    }
}

impl Board for RecordingBoard {
    fn board_id(&self) -> BoardId {
        self.id
    }
    fn valid_read(&self) -> bool {
        true
    }
    fn power_status(&self) -> bool {
        true
    }
    fn safety_relay_status(&self) -> bool {
        true
    }
    fn watchdog_timeout_status(&self) -> bool {
        false
    }
    fn safety_amp_disable(&self) -> AxisMask {
        AxisMask::empty()
    }
    fn firmware_version(&self) -> u32 {
        7
    }
    fn write_safety_relay(&mut self, enabled: bool) -> bool {
        self.push(Write::Relay(enabled))
    }
    fn write_power_enable(&mut self, enabled: bool) -> bool {
        self.push(Write::Power(enabled))
    }
    fn write_amp_enable(&mut self, _mask: AxisMask, value: AxisMask) -> bool {
        self.push(Write::AmpMask(value))
    }
    fn write_watchdog_period(&mut self, counts: u32) -> bool {
        self.push(Write::Watchdog(counts))
    }
    fn write_encoder_preload(&mut self, _axis: usize, _bits: i32) -> bool {
        true
    }
    fn set_safety_relay(&mut self, enabled: bool) {
        self.push(Write::BufferedRelay(enabled));
    }
    fn timestamp(&self) -> u32 {
        0
    }
    fn digital_input(&self) -> u32 {
        0
    }
    fn encoder_position(&self, _axis: usize) -> u32 {
        0
    }
    fn encoder_velocity(&self, _axis: usize, _latched: bool) -> u32 {
        0
    }
    fn analog_input(&self, _axis: usize) -> u32 {
        0
    }
    fn motor_current(&self, _axis: usize) -> u32 {
        0
    }
    fn amp_enable(&self, _axis: usize) -> bool {
        false
    }
    fn amp_status(&self, _axis: usize) -> bool {
        false
    }
    fn amp_temperature(&self, _index: usize) -> u32 {
        0
    }
    fn set_amp_enable(&mut self, axis: usize, enabled: bool) -> bool {
        self.push(Write::Amp(axis, enabled))
    }
    fn set_motor_current(&mut self, _axis: usize, _bits: u32) -> bool {
        true
    }
}

/// Two boards, four axes each; actuators 0..6, brakes on actuators 0 and 1
/// at the last two axes of board 8.
fn recorded_robot() -> (Robot, Log) {
    let log: Log = Arc::default();
    let boards: Vec<BoardHandle> = [7, 8]
        .into_iter()
        .map(|id| -> BoardHandle {
            Arc::new(Mutex::new(RecordingBoard {
                id,
                log: log.clone(),
            }))
        })
        .collect();
    let slot = |s: usize| AxisBinding::new(boards[s / 4].clone(), s % 4);

    let mut robot = Robot::new(robot_config(6, &[0, 1]), 10).unwrap();
    robot
        .bind((0..6).map(slot).collect(), (6..8).map(slot).collect())
        .unwrap();
    (robot, log)
}

fn writes(log: &Log) -> Vec<(BoardId, Write)> {
    log.lock().iter().map(|(id, w, _)| (*id, *w)).collect()
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn disable_clears_every_amp_before_any_board_power() {
    let (robot, log) = recorded_robot();
    robot.disable_power().unwrap();
    assert_eq!(
        writes(&log),
        vec![
            (7, Write::AmpMask(AxisMask::empty())),
            (8, Write::AmpMask(AxisMask::empty())),
            (7, Write::Power(false)),
            (7, Write::Relay(false)),
            (8, Write::Power(false)),
            (8, Write::Relay(false)),
        ]
    );
}

#[test]
fn enable_powers_boards_then_waits_then_axes() {
    let (mut robot, log) = recorded_robot();
    robot.enable_power().unwrap();

    let entries = log.lock().clone();
    let boards: Vec<_> = entries[..4].iter().map(|(id, w, _)| (*id, *w)).collect();
    assert_eq!(
        boards,
        vec![
            (7, Write::Relay(true)),
            (7, Write::Power(true)),
            (8, Write::Relay(true)),
            (8, Write::Power(true)),
        ]
    );
    let axes = &entries[4..];
    assert_eq!(axes.len(), 8);
    assert!(axes.iter().all(|(_, w, _)| matches!(w, Write::Amp(_, true))));
    assert!(axes[0].2.duration_since(entries[3].2) >= POWER_SETTLE_DELAY);
}

#[test]
fn brake_power_each_follows_brake_bindings() {
    let (robot, log) = recorded_robot();
    robot.set_brake_power_each(&[true, false]).unwrap();
    assert_eq!(
        writes(&log),
        vec![(8, Write::Amp(2, true)), (8, Write::Amp(3, false))]
    );
    assert!(robot.set_brake_power_each(&[true]).is_err());
}

#[test]
fn watchdog_and_relay_reach_each_board_once() {
    let (robot, log) = recorded_robot();
    robot.set_watchdog_period(0.0).unwrap();
    robot.set_watchdog_period(0.05).unwrap();
    robot.set_safety_relay(true).unwrap();
    assert_eq!(
        writes(&log),
        vec![
            (7, Write::Watchdog(0)),
            (8, Write::Watchdog(0)),
            (7, Write::Watchdog(9600)),
            (8, Write::Watchdog(9600)),
            (7, Write::BufferedRelay(true)),
            (8, Write::BufferedRelay(true)),
        ]
    );
}
