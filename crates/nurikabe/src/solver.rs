//! The solver: owns the grid and the work queue, and is the only thing
//! allowed to mutate cell state, through `alter`. Propagation (`process.rs`)
//! and search (`search.rs`) are implemented as further methods on this type.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cell::CellState;
use crate::change::{CellChange, ChangeSink};
use crate::config::SolverConfig;
use crate::grid::Grid;
use crate::group::find_group;
use crate::metrics::SolveMetrics;

/// Owns the puzzle state and drives propagation and search. Generic over the
/// change sink so a caller can plug in an mpsc sender, a test spy, or
/// [`crate::change::NullSink`].
pub struct Solver<K: ChangeSink> {
    pub grid: Grid,
    pub config: SolverConfig,
    pub metrics: SolveMetrics,
    pub(crate) sink: K,
    pub(crate) cancel: Arc<AtomicBool>,
    pub(crate) queue: Vec<usize>,
    pub(crate) queued: Vec<bool>,
}

impl<K: ChangeSink> Solver<K> {
    pub fn new(grid: Grid, config: SolverConfig, sink: K) -> Self {
        Self::with_cancel(grid, config, sink, Arc::new(AtomicBool::new(true)))
    }

    pub fn with_cancel(grid: Grid, config: SolverConfig, sink: K, cancel: Arc<AtomicBool>) -> Self {
        let n = grid.cells.len();
        Self {
            grid,
            config,
            metrics: SolveMetrics::default(),
            sink,
            cancel,
            queue: Vec::new(),
            queued: vec![false; n],
        }
    }

    /// A clone of the cooperative cancellation flag, for an external caller
    /// to clear from another thread.
    #[must_use]
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub(crate) fn should_continue(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    pub(crate) fn enqueue(&mut self, idx: usize) {
        if !self.queued[idx] {
            self.queued[idx] = true;
            self.queue.push(idx);
        }
    }

    pub(crate) fn dequeue(&mut self) -> Option<usize> {
        let idx = self.queue.pop()?;
        self.queued[idx] = false;
        Some(idx)
    }

    /// Every state mutation during solving goes through here: it enqueues
    /// the cell and its neighbors for reprocessing, updates state, emits a
    /// change event, and assigns ownership.
    pub fn alter(&mut self, idx: usize, state: CellState, known_owner: Option<usize>) {
        let neighbors = self.grid.cells[idx].neighbors.clone();
        for &n in &neighbors {
            self.enqueue(n);
        }
        self.enqueue(idx);

        let unchanged =
            self.grid.cells[idx].state == state && known_owner == self.grid.cells[idx].owner;
        if unchanged {
            return;
        }

        if self.grid.cells[idx].state != state {
            self.grid.cells[idx].state = state;
        }
        let (x, y) = self.grid.cells[idx].pos();
        self.sink.emit(CellChange {
            x: x as u16,
            y: y as u16,
            new_state: state,
        });

        if let Some(owner) = known_owner {
            self.grid.set_owner(idx, owner);
        } else if state == CellState::Water {
            self.grid.set_owner(idx, idx);
        } else if state.is_island() {
            // `find_group` with `remember = true` already propagates
            // ownership from an existing seed member to the rest of the
            // component; fall back to the cell's sole reacher when the
            // group has no seed in it yet (a still-unattributed fragment).
            let _ = find_group(&mut self.grid, idx, false, true);
            if self.grid.cells[idx].owner.is_none() {
                if let Some(reachers) = self.grid.cells[idx].reachers.clone() {
                    if reachers.len() == 1 {
                        self.grid.set_owner(idx, reachers[0]);
                    }
                }
            }
        }
    }
}
