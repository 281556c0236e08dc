//! The arena-backed grid: cells live in one contiguous `Vec`, indexed by
//! `y * width + x`. Neighbors, owners, and owned-cell lists are indices into
//! that same `Vec`, so the cell graph has no reference cycles.

use crate::cell::{Cell, CellState};
use crate::error::{EngineError, Result};

/// A rectangular Nurikabe board mid-solve. Out-of-bounds access is reported
/// through `Result`, not silently clamped — see the error handling design.
#[derive(Debug)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Cell>,
    /// Arena indices of every seed cell, in row-major discovery order.
    pub seeds: Vec<usize>,
    /// Total water cells any valid solution must contain.
    pub target: usize,
}

impl Grid {
    /// Build a grid from an initial board: `board[y][x] > 0` is a seed of
    /// that value, `0` is blank. Pre-placed marks are not part of this
    /// constructor's contract — callers that need them call `set_state`
    /// afterward.
    #[must_use]
    pub fn new(board: &[Vec<u16>]) -> Self {
        let height = board.len();
        let width = if height == 0 { 0 } else { board[0].len() };

        let mut cells = Vec::with_capacity(width * height);
        let mut seeds = Vec::new();
        let mut seed_sum: usize = 0;
        for (y, row) in board.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                let state = if value > 0 {
                    seed_sum += value as usize;
                    CellState::Seed(value)
                } else {
                    CellState::Blank
                };
                let idx = y * width + x;
                let mut cell = Cell::new(x as u16, y as u16, state);
                if state.is_seed() {
                    // A seed owns itself from the moment it is placed.
                    cell.owner = Some(idx);
                    cell.owns.push(idx);
                    seeds.push(idx);
                }
                cells.push(cell);
            }
        }

        let mut grid = Self {
            width,
            height,
            cells,
            seeds,
            target: width * height - seed_sum,
        };
        grid.link_neighbors();
        grid
    }

    fn link_neighbors(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let mut neighbors = Vec::with_capacity(4);
                if x > 0 {
                    neighbors.push(idx - 1);
                }
                if x + 1 < self.width {
                    neighbors.push(idx + 1);
                }
                if y > 0 {
                    neighbors.push(idx - self.width);
                }
                if y + 1 < self.height {
                    neighbors.push(idx + self.width);
                }
                self.cells[idx].neighbors = neighbors;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    #[inline]
    fn require_index(&self, x: i64, y: i64) -> Result<usize> {
        if self.in_bounds(x, y) {
            Ok(y as usize * self.width + x as usize)
        } else {
            Err(EngineError::OutOfBounds {
                x: x as i32,
                y: y as i32,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get_state(&self, x: i64, y: i64) -> Result<CellState> {
        self.require_index(x, y).map(|idx| self.cells[idx].state)
    }

    /// Attempts to set the state at `(x, y)`. Returns `Ok(true)` if the cell
    /// actually changed, `Ok(false)` if it already held that state or the
    /// cell is a seed (seeds are immutable for the puzzle's lifetime).
    pub fn set_state(&mut self, x: i64, y: i64, state: CellState) -> Result<bool> {
        let idx = self.require_index(x, y)?;
        let cell = &mut self.cells[idx];
        if cell.state.is_seed() || cell.state == state {
            return Ok(false);
        }
        cell.state = state;
        Ok(true)
    }

    /// True iff `(x, y)` is the top-left corner of a 2x2 all-water block.
    #[must_use]
    pub fn is_puddle(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        if x + 1 >= self.width || y + 1 >= self.height {
            return false;
        }
        let w = self.width;
        self.cells[y * w + x].state == CellState::Water
            && self.cells[y * w + x + 1].state == CellState::Water
            && self.cells[(y + 1) * w + x].state == CellState::Water
            && self.cells[(y + 1) * w + x + 1].state == CellState::Water
    }

    #[must_use]
    pub fn get_blanks(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.state == CellState::Blank)
            .map(|(i, _)| i)
            .collect()
    }

    /// A flat copy of every cell's state, for the search driver's
    /// snapshot/restore of tentative guesses.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CellState> {
        self.cells.iter().map(|c| c.state).collect()
    }

    /// Restores every cell's state from a prior `snapshot`, clearing owner
    /// and reacher bookkeeping so it can be rebuilt from scratch. Returns the
    /// indices that actually changed, in cell order, so a caller wiring up a
    /// change stream can emit a faithful undo.
    pub fn restore(&mut self, snapshot: &[CellState]) -> Vec<usize> {
        let mut changed = Vec::new();
        for (idx, &state) in snapshot.iter().enumerate() {
            if self.cells[idx].state != state {
                self.cells[idx].state = state;
                changed.push(idx);
            }
        }
        self.reset_ownership();
        changed
    }

    /// Clears owner/owns/reacher bookkeeping on every cell. Seeds regain
    /// self-ownership; everything else goes back to ownerless-with-no-reachers
    /// until the next `process_all` recomputes reachers.
    pub fn reset_ownership(&mut self) {
        for idx in 0..self.cells.len() {
            let is_seed = self.cells[idx].state.is_seed();
            let cell = &mut self.cells[idx];
            cell.owns.clear();
            if is_seed {
                cell.owner = Some(idx);
                cell.owns.push(idx);
                cell.reachers = None;
            } else {
                cell.owner = None;
                cell.reachers = Some(Vec::new());
            }
        }
    }

    /// Assigns `owner` to `idx`, by convention appending `idx` to the owner's
    /// `owns` list and clearing `idx`'s reacher set (an owned cell has no
    /// further use for one).
    pub fn set_owner(&mut self, idx: usize, owner: usize) {
        self.cells[idx].owner = Some(owner);
        self.cells[idx].reachers = None;
        if !self.cells[owner].owns.contains(&idx) {
            self.cells[owner].owns.push(idx);
        }
    }

    #[inline]
    #[must_use]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    #[must_use]
    pub fn manhattan(&self, a: usize, b: usize) -> i64 {
        let (ax, ay) = (self.cells[a].x as i64, self.cells[a].y as i64);
        let (bx, by) = (self.cells[b].x as i64, self.cells[b].y as i64);
        (ax - bx).abs() + (ay - by).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: usize, cols: usize) -> Vec<Vec<u16>> {
        vec![vec![0; cols]; rows]
    }

    #[test]
    fn new_grid_has_expected_target() {
        let mut b = board(3, 3);
        b[0][0] = 5;
        let grid = Grid::new(&b);
        assert_eq!(grid.target, 9 - 5);
        assert_eq!(grid.seeds.len(), 1);
    }

    #[test]
    fn corner_cell_has_two_neighbors() {
        let grid = Grid::new(&board(3, 3));
        assert_eq!(grid.cells[0].neighbors.len(), 2);
        assert_eq!(grid.cells[grid.index_of(1, 1)].neighbors.len(), 4);
    }

    #[test]
    fn out_of_bounds_get_state_errors() {
        let grid = Grid::new(&board(2, 2));
        assert!(matches!(
            grid.get_state(-1, 0),
            Err(EngineError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.get_state(2, 0),
            Err(EngineError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn set_state_rejects_seed_mutation() {
        let mut b = board(2, 2);
        b[0][0] = 1;
        let mut grid = Grid::new(&b);
        let changed = grid.set_state(0, 0, CellState::Water).unwrap();
        assert!(!changed);
        assert_eq!(grid.get_state(0, 0).unwrap(), CellState::Seed(1));
    }

    #[test]
    fn set_state_reports_no_change_when_state_is_unchanged() {
        let mut grid = Grid::new(&board(2, 2));
        assert!(grid.set_state(0, 0, CellState::Water).unwrap());
        assert!(!grid.set_state(0, 0, CellState::Water).unwrap());
    }

    #[test]
    fn is_puddle_detects_2x2_all_water() {
        let mut grid = Grid::new(&board(2, 2));
        for &(x, y) in &[(0, 0), (1, 0), (0, 1), (1, 1)] {
            grid.set_state(x, y, CellState::Water).unwrap();
        }
        assert!(grid.is_puddle(0, 0));
    }

    #[test]
    fn is_puddle_false_at_grid_edge() {
        let grid = Grid::new(&board(2, 2));
        assert!(!grid.is_puddle(1, 1));
        assert!(!grid.is_puddle(-1, -1));
    }

    #[test]
    fn snapshot_restore_round_trip() {
        let mut grid = Grid::new(&board(3, 3));
        let before = grid.snapshot();
        grid.set_state(0, 0, CellState::Water).unwrap();
        grid.set_state(1, 1, CellState::Island).unwrap();
        let changed = grid.restore(&before);
        assert_eq!(changed.len(), 2);
        assert_eq!(grid.snapshot(), before);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_mark() -> impl Strategy<Value = CellState> {
            prop_oneof![Just(CellState::Water), Just(CellState::Island)]
        }

        proptest! {
            // Whatever a sequence of `set_state` calls does to a blank 4x4
            // board, restoring the pre-mutation snapshot always gets back
            // to exactly that snapshot.
            #[test]
            fn prop_snapshot_restore_round_trip(
                marks in proptest::collection::vec((0i64..4, 0i64..4, arb_mark()), 0..12),
            ) {
                let mut grid = Grid::new(&board(4, 4));
                let before = grid.snapshot();
                for (x, y, state) in marks {
                    let _ = grid.set_state(x, y, state);
                }
                grid.restore(&before);
                prop_assert_eq!(grid.snapshot(), before);
            }
        }
    }
}
