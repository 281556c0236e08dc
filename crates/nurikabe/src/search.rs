//! Guess-driven backtracking: once propagation alone reaches a fixed point
//! short of a solution, the remaining blanks are tried one at a time, guided
//! by a scoring heuristic, first locally (immediately provable guesses) then
//! recursively (full depth-first backtracking) until the board is solved.

use crate::cell::CellState;
use crate::change::{ChangeSink, Verdict};
use crate::group::find_group;
use crate::solver::Solver;
use crate::validator::{check, status, Status};

/// The result of trying a single cell's two possible values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuessOutcome {
    /// Both values were tried; the grid is left holding the one conclusively
    /// correct value (the other led to a contradiction).
    Conclusive,
    /// Both values led to a contradiction: the puzzle has no solution
    /// consistent with the cells fixed so far.
    Deadend,
    /// Both values are still consistent; the grid is restored unchanged.
    Inconclusive,
    /// One of the two values solved the puzzle outright; left in place.
    Victory,
    /// Not a blank cell by the time this guess came up; nothing to do.
    Skipped,
}

impl<K: ChangeSink> Solver<K> {
    /// Runs the full pipeline: fresh setup, propagation to a fixed point,
    /// a local pass of single-cell guesses, then full recursive backtracking
    /// if anything remains undecided.
    pub fn solve(&mut self) -> Verdict {
        self.setup();
        self.process_all();

        'outer: while self.should_continue() {
            let mut changed_count = 0usize;
            let guess_queue = self.ordered_guess_queue();
            for idx in guess_queue {
                match self.guess_single(idx) {
                    GuessOutcome::Victory => {
                        changed_count = 0;
                        break 'outer;
                    }
                    GuessOutcome::Conclusive => changed_count += 1,
                    GuessOutcome::Inconclusive | GuessOutcome::Skipped => {}
                    GuessOutcome::Deadend => {
                        return self.verdict();
                    }
                }
            }
            if changed_count == 0 {
                break;
            }
        }

        if status(&mut self.grid) != Status::Solved && self.should_continue() {
            let final_queue = self.ordered_guess_queue();
            if !final_queue.is_empty() {
                self.guess_recur(&final_queue, 0);
            }
        }

        self.metrics.log_summary();
        self.verdict()
    }

    fn verdict(&mut self) -> Verdict {
        let (status, flags) = check(&mut self.grid);
        match status {
            Status::Solved => Verdict::Solved,
            Status::Okay => Verdict::Okay {
                blanks_left: self.grid.get_blanks().len(),
            },
            Status::Error => Verdict::Error {
                flagged: flags.into_iter().map(|f| (f.x, f.y)).collect(),
            },
        }
    }

    fn ordered_guess_queue(&mut self) -> Vec<usize> {
        let mut blanks = self.grid.get_blanks();
        let scores: Vec<f64> = blanks.iter().map(|&idx| self.guess_score(idx)).collect();
        let mut order: Vec<usize> = (0..blanks.len()).collect();
        order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap());
        blanks = order.into_iter().map(|i| blanks[i]).collect();
        blanks
    }

    /// Heuristic ranking of how informative guessing a cell is likely to be:
    /// favors cells far from other blanks, close to seeds still missing a
    /// lot of territory, and near the board's center.
    fn guess_score(&mut self, idx: usize) -> f64 {
        let mut score = 0.0f64;
        for &nb in &self.grid.cells[idx].neighbors.clone() {
            if self.grid.cells[nb].state == CellState::Blank {
                score -= 5.0;
            }
        }
        let reachers = self.grid.cells[idx].reachers.clone().unwrap_or_default();
        for reacher in reachers {
            let group = find_group(&mut self.grid, reacher, false, false);
            let value = self.grid.cells[reacher].state.seed_value().unwrap() as i64;
            let left = (value - group.spaces.len() as i64).max(1) as f64;
            score += 10.0 / left;
            score -= self.grid.manhattan(idx, reacher) as f64 * 3.0;
        }
        let (x, y) = self.grid.cells[idx].pos();
        score += (x as f64 - self.grid.width as f64 / 2.0).abs() * 0.5;
        score += (y as f64 - self.grid.height as f64 / 2.0).abs() * 0.5;
        score
    }

    fn guess_order(&self, idx: usize) -> (CellState, CellState) {
        match self.grid.cells[idx].flag {
            Some(CellState::Water) => (CellState::Island, CellState::Water),
            Some(CellState::Island) => (CellState::Water, CellState::Island),
            _ => (CellState::Island, CellState::Water),
        }
    }

    /// Restores a prior snapshot, emitting a change event for every cell
    /// that actually moved.
    fn restore_snapshot(&mut self, snapshot: &[CellState]) {
        let changed = self.grid.restore(snapshot);
        for idx in changed {
            let (x, y) = self.grid.cells[idx].pos();
            self.sink.emit(crate::change::CellChange {
                x: x as u16,
                y: y as u16,
                new_state: self.grid.cells[idx].state,
            });
        }
    }

    fn guess_single(&mut self, guessing: usize) -> GuessOutcome {
        if !self.should_continue() {
            return GuessOutcome::Deadend;
        }
        if self.grid.cells[guessing].state != CellState::Blank {
            return GuessOutcome::Skipped;
        }

        self.metrics.guessed_count += 1;
        let save = self.grid.snapshot();
        let (try1, try2) = self.guess_order(guessing);
        let mut by_poe: Option<CellState> = None;

        self.alter(guessing, try1, None);
        self.process_all();
        match status(&mut self.grid) {
            Status::Solved => return GuessOutcome::Victory,
            Status::Error => by_poe = Some(try2),
            Status::Okay => {}
        }
        let other = if by_poe.is_none() {
            Some(self.grid.snapshot())
        } else {
            None
        };

        self.metrics.guessed_count += 1;
        self.restore_snapshot(&save);
        self.alter(guessing, try2, None);
        self.process_all();
        match status(&mut self.grid) {
            Status::Solved => GuessOutcome::Victory,
            Status::Error => {
                if by_poe.is_some() {
                    self.restore_snapshot(&save);
                    GuessOutcome::Deadend
                } else {
                    self.restore_snapshot(&other.unwrap());
                    GuessOutcome::Conclusive
                }
            }
            Status::Okay => {
                if by_poe.is_some() {
                    GuessOutcome::Conclusive
                } else {
                    self.restore_snapshot(&save);
                    GuessOutcome::Inconclusive
                }
            }
        }
    }

    /// Full depth-first backtracking over the remaining blanks in
    /// `guess_queue`, starting at `index`. Returns `true` as soon as one
    /// branch reaches a solved board, leaving the grid in that state.
    fn guess_recur(&mut self, guess_queue: &[usize], index: usize) -> bool {
        if !self.should_continue() || guess_queue.is_empty() {
            return false;
        }
        let mut index = index;
        while index < guess_queue.len()
            && self.grid.cells[guess_queue[index]].state != CellState::Blank
        {
            index += 1;
        }
        if index >= guess_queue.len() {
            return false;
        }
        let guessing = guess_queue[index];
        let save = self.grid.snapshot();
        let (try1, try2) = self.guess_order(guessing);

        self.metrics.guessed_count += 1;
        self.alter(guessing, try1, None);
        self.process_all();
        match status(&mut self.grid) {
            Status::Solved => return true,
            Status::Okay => {
                if self.guess_recur(guess_queue, index + 1) {
                    return true;
                }
            }
            Status::Error => {}
        }

        if !self.should_continue() {
            return false;
        }

        self.metrics.guessed_count += 1;
        self.restore_snapshot(&save);
        self.alter(guessing, try2, None);
        self.process_all();
        match status(&mut self.grid) {
            Status::Solved => true,
            Status::Okay => self.guess_recur(guess_queue, index + 1),
            Status::Error => false,
        }
    }
}
