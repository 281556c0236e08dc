//! Constraint propagation: the local rules in `process`, and the heavier
//! whole-grid passes in `process_all` that loop until a fixed point (or an
//! error) is reached.

use crate::cell::CellState;
use crate::change::ChangeSink;
use crate::group::{find_group, GroupType};
use crate::reach::{calculate_reachers, from_good_pairs};
use crate::solver::Solver;
use crate::validator::{status, Status};

impl<K: ChangeSink> Solver<K> {
    /// Prepares a fresh board for solving: blanks every non-seed cell,
    /// trivially surrounds size-1 seeds with water, marks any blank with two
    /// or more seed neighbors as water, queues every other seed, then runs
    /// one pass of `process`.
    pub fn setup(&mut self) {
        let n = self.grid.cells.len();
        for idx in 0..n {
            if !self.grid.cells[idx].state.is_seed() {
                self.grid.cells[idx].state = CellState::Blank;
            }
            self.grid.cells[idx].reachers = Some(Vec::new());
            self.grid.cells[idx].owner = None;
        }
        self.grid.reset_ownership();
        self.queue.clear();
        self.queued = vec![false; n];

        let mut seeds = self.grid.seeds.clone();
        seeds.sort_by_key(|&s| std::cmp::Reverse(self.grid.cells[s].state.seed_value().unwrap()));
        for seed in seeds {
            if self.grid.cells[seed].state.seed_value() == Some(1) {
                let neighbors = self.grid.cells[seed].neighbors.clone();
                for n in neighbors {
                    self.alter(n, CellState::Water, None);
                }
            } else {
                self.enqueue(seed);
            }
        }

        for idx in 0..n {
            let seed_neighbors = self.grid.cells[idx]
                .neighbors
                .iter()
                .filter(|&&nb| self.grid.cells[nb].state.is_seed())
                .count();
            if seed_neighbors >= 2 {
                self.alter(idx, CellState::Water, None);
            }
        }

        self.process();
    }

    /// Drains the work queue, applying the three cheap local rules: a water
    /// pond with a single outlet grows into it, an island with its last free
    /// neighbor grows there (or, if already complete, seals itself off with
    /// water), and a blank pinched between two different islands becomes
    /// water.
    pub fn process(&mut self) {
        while let Some(idx) = self.dequeue() {
            if !self.should_continue() {
                return;
            }
            self.metrics.processed_count += 1;

            match self.grid.cells[idx].state {
                CellState::Water => {
                    let group = find_group(&mut self.grid, idx, false, false);
                    if group.dofs.len() == 1 && group.spaces.len() < self.grid.target {
                        self.alter(group.dofs[0], CellState::Water, None);
                    }
                }
                state if state.is_island() => {
                    let group = find_group(&mut self.grid, idx, false, false);
                    let left = if group.group_type == GroupType::LoneIsland {
                        1
                    } else {
                        let value = self.grid.cells[group.numbers[0]]
                            .state
                            .seed_value()
                            .unwrap() as i64;
                        value - group.spaces.len() as i64
                    };

                    if left == 0 {
                        for dof in group.dofs.clone() {
                            self.alter(dof, CellState::Water, None);
                        }
                    } else if group.dofs.len() == 1 {
                        self.alter(group.dofs[0], CellState::Island, None);
                    }
                }
                CellState::Blank => {
                    let mut shores = Vec::new();
                    for &nb in &self.grid.cells[idx].neighbors.clone() {
                        let nb_cell = &self.grid.cells[nb];
                        if nb_cell.state.is_island() {
                            if let Some(owner) = nb_cell.owner {
                                if !shores.contains(&owner) {
                                    shores.push(owner);
                                }
                            }
                        }
                    }
                    if shores.len() >= 2 {
                        self.alter(idx, CellState::Water, None);
                    }
                }
                CellState::Infer => {}
            }
        }
    }

    /// The heavier, whole-grid heuristics: promoting `Infer` marks, chaining
    /// disconnected island fragments, marking unreachable blanks as water,
    /// anti-puddle deduction, good-pair chaining, and the "island forks
    /// around a fixed point" rule. Loops until an iteration makes no changes
    /// or the grid is found contradictory.
    pub fn process_all(&mut self) {
        let mut changed = true;
        while changed && status(&mut self.grid) != Status::Error {
            changed = false;
            self.metrics.loop_count += 1;

            let infers: Vec<usize> = (0..self.grid.cells.len())
                .filter(|&i| self.grid.cells[i].state == CellState::Infer)
                .collect();
            for idx in infers {
                self.alter(idx, CellState::Island, None);
                changed = true;
            }

            let forced = calculate_reachers(&mut self.grid, &self.config);
            self.metrics.grouped_count += self.grid.seeds.len() as u64;
            for (isle, owner) in forced {
                self.alter(isle, CellState::Island, Some(owner));
                changed = true;
            }

            for idx in 0..self.grid.cells.len() {
                let cell = &self.grid.cells[idx];
                if cell.state == CellState::Blank
                    && cell.owner.is_none()
                    && cell.reachers.as_ref().map_or(false, |r| r.is_empty())
                {
                    self.alter(idx, CellState::Water, None);
                    changed = true;
                } else if cell.state.is_island() && cell.owner.is_none() {
                    if let Some(reachers) = cell.reachers.clone() {
                        if reachers.len() == 1 {
                            let reacher = reachers[0];
                            self.alter(idx, CellState::Island, Some(reacher));
                            changed = true;
                        }
                    }
                }
            }

            self.process();

            let mut antipuddles = Vec::new();
            for idx in 0..self.grid.cells.len() {
                if self.grid.cells[idx].state != CellState::Blank {
                    continue;
                }
                let (x, y) = self.grid.cells[idx].pos();
                let (xi, yi) = (x as i64, y as i64);
                self.grid.cells[idx].state = CellState::Water;
                let completes_puddle = self.grid.is_puddle(xi, yi)
                    || self.grid.is_puddle(xi, yi - 1)
                    || self.grid.is_puddle(xi - 1, yi)
                    || self.grid.is_puddle(xi - 1, yi - 1);
                self.grid.cells[idx].state = CellState::Blank;
                if completes_puddle {
                    antipuddles.push(idx);
                }
            }
            for idx in antipuddles {
                self.alter(idx, CellState::Island, None);
                changed = true;
            }

            let pairs = from_good_pairs(&mut self.grid, &self.config);
            for (isle, owner) in pairs {
                self.alter(isle, CellState::Island, Some(owner));
                changed = true;
            }

            for seed in self.grid.seeds.clone() {
                let group = find_group(&mut self.grid, seed, false, false);
                let value = self.grid.cells[seed].state.seed_value().unwrap() as i64;
                if value - group.spaces.len() as i64 == 1 && group.dofs.len() == 2 {
                    for fork in common_blanks(&self.grid, &group.dofs) {
                        self.alter(fork, CellState::Water, None);
                        changed = true;
                    }
                }
            }

            self.process();
        }
    }
}

/// Blanks adjacent to every cell in `spaces`. With one space, every blank
/// neighbor counts; with two, only their shared blank neighbors; with more
/// than two there is nothing meaningfully "common" to report.
fn common_blanks(grid: &crate::grid::Grid, spaces: &[usize]) -> Vec<usize> {
    match spaces.len() {
        0 => Vec::new(),
        1 => grid.cells[spaces[0]]
            .neighbors
            .iter()
            .copied()
            .filter(|&n| grid.cells[n].state == CellState::Blank)
            .collect(),
        2 => {
            let one: Vec<usize> = grid.cells[spaces[0]]
                .neighbors
                .iter()
                .copied()
                .filter(|&n| grid.cells[n].state == CellState::Blank)
                .collect();
            grid.cells[spaces[1]]
                .neighbors
                .iter()
                .copied()
                .filter(|&n| grid.cells[n].state == CellState::Blank && one.contains(&n))
                .collect()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::NullSink;
    use crate::config::SolverConfig;
    use crate::grid::Grid;

    fn board(rows: usize, cols: usize) -> Vec<Vec<u16>> {
        vec![vec![0; cols]; rows]
    }

    #[test]
    fn setup_surrounds_size_one_seed_with_water() {
        let mut b = board(1, 3);
        b[0][1] = 1;
        let grid = Grid::new(&b);
        let mut solver = Solver::new(grid, SolverConfig::default(), NullSink);
        solver.setup();
        assert_eq!(solver.grid.cells[0].state, CellState::Water);
        assert_eq!(solver.grid.cells[2].state, CellState::Water);
    }

    #[test]
    fn process_all_solves_a_trivial_single_seed_board() {
        let mut b = board(1, 1);
        b[0][0] = 1;
        let grid = Grid::new(&b);
        let mut solver = Solver::new(grid, SolverConfig::default(), NullSink);
        solver.setup();
        solver.process_all();
        assert_eq!(status(&mut solver.grid), Status::Solved);
    }

    #[test]
    fn process_all_grows_island_with_single_free_neighbor() {
        let mut b = board(1, 3);
        b[0][0] = 2;
        let grid = Grid::new(&b);
        let mut solver = Solver::new(grid, SolverConfig::default(), NullSink);
        solver.setup();
        solver.process_all();
        assert_eq!(status(&mut solver.grid), Status::Solved);
        assert!(solver.grid.cells[1].state.is_island());
        assert_eq!(solver.grid.cells[2].state, CellState::Water);
    }
}
