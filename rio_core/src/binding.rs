//! Actuator/brake → (board, axis) binding table.
//!
//! Several axes may live on one board; the table keeps each physical board
//! exactly once, keyed by its identifier, so board-level status and writes
//! happen once per board.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rio_common::consts::{AXES_PER_BOARD, MAX_BOARDS};
use rio_common::robot::board::{AxisBinding, BoardHandle, BoardId};
use rio_common::robot::error::{BoardIds, RobotError};

use crate::convert::velocity::VelocityCounter;

pub struct BoardBinding {
    actuators: Vec<AxisBinding>,
    brakes: Vec<AxisBinding>,
    boards: BTreeMap<BoardId, BoardHandle>,
    velocity_counter: VelocityCounter,
}

impl BoardBinding {
    /// Build the table for `robot`.
    ///
    /// # Errors
    /// [`RobotError::Configuration`] when the binding counts differ from the
    /// expected counts, an axis index is out of range, two distinct boards
    /// share an identifier, or more than [`MAX_BOARDS`] boards are bound.
    pub fn new(
        robot: &str,
        actuators: Vec<AxisBinding>,
        brakes: Vec<AxisBinding>,
        expected_actuators: usize,
        expected_brakes: usize,
    ) -> Result<Self, RobotError> {
        if actuators.len() != expected_actuators {
            return Err(RobotError::configuration(
                robot,
                format!(
                    "{} actuator bindings for {expected_actuators} actuators",
                    actuators.len()
                ),
            ));
        }
        if brakes.len() != expected_brakes {
            return Err(RobotError::configuration(
                robot,
                format!("{} brake bindings for {expected_brakes} brakes", brakes.len()),
            ));
        }

        let mut boards: BTreeMap<BoardId, BoardHandle> = BTreeMap::new();
        for (kind, list) in [("actuator", &actuators), ("brake", &brakes)] {
            for (index, binding) in list.iter().enumerate() {
                if binding.axis >= AXES_PER_BOARD {
                    return Err(RobotError::configuration(
                        robot,
                        format!("{kind} {index}: axis {} out of range", binding.axis),
                    ));
                }
                let id = binding.board_id();
                match boards.get(&id) {
                    Some(known) if !Arc::ptr_eq(known, &binding.board) => {
                        return Err(RobotError::configuration(
                            robot,
                            format!("{kind} {index}: board id {id} used by two different boards"),
                        ));
                    }
                    Some(_) => {}
                    None => {
                        boards.insert(id, binding.board.clone());
                    }
                }
            }
        }
        if boards.len() > MAX_BOARDS {
            return Err(RobotError::configuration(
                robot,
                format!("{} boards bound, at most {MAX_BOARDS} supported", boards.len()),
            ));
        }

        let velocity_counter =
            VelocityCounter::for_firmware(boards.values().map(|b| b.lock().firmware_version()));

        Ok(Self {
            actuators,
            brakes,
            boards,
            velocity_counter,
        })
    }

    pub fn actuators(&self) -> &[AxisBinding] {
        &self.actuators
    }

    pub fn brakes(&self) -> &[AxisBinding] {
        &self.brakes
    }

    /// Unique boards in ascending identifier order.
    pub fn boards(&self) -> impl Iterator<Item = (BoardId, &BoardHandle)> {
        self.boards.iter().map(|(id, b)| (*id, b))
    }

    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    pub fn board_ids(&self) -> BoardIds {
        self.boards.keys().copied().collect()
    }

    /// Velocity counter capability shared by every bound board.
    pub fn velocity_counter(&self) -> VelocityCounter {
        self.velocity_counter
    }
}

impl fmt::Debug for BoardBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardBinding")
            .field("actuators", &self.actuators)
            .field("brakes", &self.brakes)
            .field("boards", &self.boards.keys().collect::<Vec<_>>())
            .field("velocity_counter", &self.velocity_counter)
            .finish()
    }
}
