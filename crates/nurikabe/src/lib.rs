//! Nurikabe solving engine: constraint propagation over an arena-indexed
//! grid, falling back to guess-driven backtracking search when propagation
//! alone cannot finish the puzzle.
//!
//! The core (`Grid`, `Solver`, `validator`) is plain Rust with no knowledge
//! of WebAssembly; [`PuzzleSolver`] is a thin `wasm-bindgen` wrapper for
//! browser/JS callers, in the same spirit as a GPU-facing front end that
//! just forwards into a native engine.

pub mod cell;
pub mod change;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod grid;
pub mod group;
pub mod metrics;
pub mod propagate;
pub mod reach;
pub mod search;
pub mod solver;
pub mod validator;

use std::cell::RefCell;
use std::fmt;

use wasm_bindgen::prelude::*;

pub use cell::CellState;
pub use change::{CellChange, ChangeSink, Verdict};
pub use config::SolverConfig;
pub use error::{EngineError, Result};
pub use grid::Grid;
pub use solver::Solver;
pub use validator::Status;

/// Collects change events into a flat `(x, y, state-code)` buffer a JS
/// caller can read via [`PuzzleSolver::changes_ptr`]/[`PuzzleSolver::changes_len`],
/// the same pointer-buffer idiom used for this engine's render buffers.
#[derive(Debug, Default)]
struct BufferSink {
    buffer: RefCell<Vec<u16>>,
}

impl ChangeSink for BufferSink {
    fn emit(&self, change: CellChange) {
        let mut buffer = self.buffer.borrow_mut();
        buffer.push(change.x);
        buffer.push(change.y);
        buffer.push(state_code(change.new_state));
    }
}

fn state_code(state: CellState) -> u16 {
    match state {
        CellState::Blank => 0,
        CellState::Water => 1,
        CellState::Island => 2,
        CellState::Infer => 3,
        CellState::Seed(_) => 4,
    }
}

/// `wasm-bindgen` front end: owns a [`Solver`] over a [`BufferSink`] so a JS
/// caller can drain the change stream through a flat buffer rather than
/// crossing the FFI boundary once per cell.
#[wasm_bindgen]
pub struct PuzzleSolver {
    solver: Solver<BufferSink>,
    verdict: Option<Verdict>,
}

impl fmt::Debug for PuzzleSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PuzzleSolver")
            .field("width", &self.solver.grid.width)
            .field("height", &self.solver.grid.height)
            .field("verdict", &self.verdict)
            .finish()
    }
}

#[wasm_bindgen]
impl PuzzleSolver {
    /// Builds a solver from a flattened row-major board: `board[y * cols + x]`
    /// is the seed value at `(x, y)`, `0` for blank.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(rows: usize, cols: usize, board: &[u16]) -> Self {
        let mut rows_vec = Vec::with_capacity(rows);
        for y in 0..rows {
            rows_vec.push(board[y * cols..(y + 1) * cols].to_vec());
        }
        let grid = Grid::new(&rows_vec);
        let solver = Solver::new(grid, SolverConfig::default(), BufferSink::default());
        Self {
            solver,
            verdict: None,
        }
    }

    /// Runs the full solve pipeline and records the terminal verdict.
    pub fn solve(&mut self) {
        self.verdict = Some(self.solver.solve());
    }

    /// Clears the cooperative cancellation flag so a running `solve` (if
    /// driven from another thread) stops at its next checkpoint.
    pub fn cancel(&self) {
        self.solver
            .cancel_handle()
            .store(false, std::sync::atomic::Ordering::Relaxed);
    }

    /// `0` = solved, `1` = okay-but-incomplete, `2` = error; `3` before the
    /// first `solve()` call.
    #[must_use]
    pub fn verdict_code(&self) -> u8 {
        match &self.verdict {
            Some(Verdict::Solved) => 0,
            Some(Verdict::Okay { .. }) => 1,
            Some(Verdict::Error { .. }) => 2,
            None => 3,
        }
    }

    #[must_use]
    pub fn get_state(&self, x: i64, y: i64) -> u16 {
        self.solver
            .grid
            .get_state(x, y)
            .map(state_code)
            .unwrap_or(0)
    }

    /// Pointer to the pending change buffer: flat `u16` triples of
    /// `(x, y, state-code)` in emission order.
    #[must_use]
    pub fn changes_ptr(&self) -> *const u16 {
        self.solver.sink.buffer.borrow().as_ptr()
    }

    /// Number of `u16`s in the change buffer (three per event).
    #[must_use]
    pub fn changes_len(&self) -> usize {
        self.solver.sink.buffer.borrow().len()
    }

    /// Drops every buffered change once a caller has read it.
    pub fn clear_changes(&self) {
        self.solver.sink.buffer.borrow_mut().clear();
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.solver.grid.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.solver.grid.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn puzzle_solver_solves_a_trivial_board() {
        let mut p = PuzzleSolver::new(1, 1, &[1]);
        p.solve();
        assert_eq!(p.verdict_code(), 0);
    }

    #[test]
    fn puzzle_solver_reports_contradiction() {
        let mut p = PuzzleSolver::new(1, 2, &[1, 1]);
        p.solve();
        assert_eq!(p.verdict_code(), 2);
    }
}
