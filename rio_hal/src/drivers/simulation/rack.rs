//! A rack of simulated boards with sequential axis slots.

use super::board::SimBoard;
use parking_lot::Mutex;
use rio_common::consts::AXES_PER_BOARD;
use rio_common::robot::board::{AxisBinding, BoardHandle, BoardId};
use std::sync::Arc;
use tracing::debug;

/// Boards numbered by slot: slot `s` is axis `s % 4` of board `s / 4`.
pub struct SimRack {
    boards: Vec<(Arc<Mutex<SimBoard>>, BoardHandle)>,
}

impl SimRack {
    /// One healthy board per id, in slot order.
    pub fn new(ids: &[BoardId]) -> Self {
        Self::from_boards(ids.iter().map(|&id| SimBoard::new(id)))
    }

    pub fn from_boards(boards: impl IntoIterator<Item = SimBoard>) -> Self {
        let boards: Vec<_> = boards.into_iter().map(SimBoard::shared).collect();
        debug!(boards = boards.len(), "sim rack assembled");
        Self { boards }
    }

    /// Typed access to the board in rack position `index`.
    pub fn board(&self, index: usize) -> &Arc<Mutex<SimBoard>> {
        &self.boards[index].0
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Total axis slots in the rack.
    pub fn slots(&self) -> usize {
        self.boards.len() * AXES_PER_BOARD
    }

    /// Bindings for `count` consecutive slots starting at `first_slot`.
    ///
    /// # Panics
    /// If the slots run past the last board.
    pub fn bindings(&self, first_slot: usize, count: usize) -> Vec<AxisBinding> {
        (first_slot..first_slot + count)
            .map(|slot| {
                let handle = self.boards[slot / AXES_PER_BOARD].1.clone();
                AxisBinding::new(handle, slot % AXES_PER_BOARD)
            })
            .collect()
    }

    /// Apply `f` to every board.
    pub fn for_each(&self, mut f: impl FnMut(&mut SimBoard)) {
        for (typed, _) in &self.boards {
            f(&mut typed.lock());
        }
    }
}
