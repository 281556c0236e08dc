//! `check`/`status`: runs inferred-mode group analysis over the whole grid
//! and decides whether it looks like a solved puzzle, a puzzle still worth
//! pursuing, or one that has gone wrong. Neither function mutates the grid's
//! committed state beyond the `Infer` promotion `find_group` performs on
//! itself.
//!
//! `status` is the fast form the solver polls internally: it returns as soon
//! as the verdict is known. `check` always runs the full sweep and collects
//! every cell a caller should highlight, for interactive feedback after a
//! user edit.

use crate::cell::CellState;
use crate::grid::Grid;
use crate::group::{find_group, Group, GroupType};

/// The validator's read of a grid's overall state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    Solved,
    Okay,
    Error,
}

/// A flagged cell, for UI highlighting.
#[derive(Clone, Copy, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub struct Flag {
    pub x: u16,
    pub y: u16,
}

/// Fast internal verdict: bails out the moment the outcome is certain.
pub fn status(grid: &mut Grid) -> Status {
    for seed in grid.seeds.clone() {
        let g = find_group(grid, seed, false, false);
        if g.group_type == GroupType::InvalidIsland {
            return Status::Error;
        }
    }

    let n = grid.cells.len();
    let mut visited = vec![false; n];
    let mut incomplete = false;

    for start in 0..n {
        if visited[start] || grid.cells[start].state == CellState::Water {
            continue;
        }
        let g = find_group(grid, start, true, false);
        mark_visited(&mut visited, &g);
        match g.group_type {
            GroupType::InvalidIsland => return Status::Error,
            GroupType::Incomplete | GroupType::LoneBlank => incomplete = true,
            _ => {}
        }
    }

    let mut target_acquired = false;
    let mut water_count = 0usize;
    for start in 0..n {
        if visited[start] || grid.cells[start].state != CellState::Water {
            continue;
        }
        let g = find_group(grid, start, true, false);
        for &m in &g.spaces {
            visited[m] = true;
        }
        water_count += 1;
        match g.group_type {
            GroupType::InvalidWater => return Status::Error,
            GroupType::ClosedWater => {
                if g.spaces.len() == grid.target {
                    target_acquired = true;
                } else {
                    return Status::Error;
                }
            }
            _ => {}
        }
    }

    // An all-island board (`target == 0`) never produces a water component,
    // so the water-counting criterion below can never fire for it; treat the
    // absence of water plus the absence of any outstanding island work as
    // solved directly.
    if grid.target == 0 {
        if incomplete {
            Status::Okay
        } else {
            Status::Solved
        }
    } else if target_acquired && water_count == 1 {
        Status::Solved
    } else if !target_acquired && incomplete {
        Status::Okay
    } else {
        Status::Error
    }
}

fn mark_visited(visited: &mut [bool], g: &Group) {
    for &m in g.spaces.iter().chain(g.dofs.iter()) {
        visited[m] = true;
    }
}

/// Full sweep: always classifies every group before deciding, so that on
/// `Error` it can report a complete, stable set of cells to highlight.
pub fn check(grid: &mut Grid) -> (Status, Vec<Flag>) {
    let mut crowded: Vec<Group> = Vec::new();
    for seed in grid.seeds.clone() {
        let g = find_group(grid, seed, false, false);
        if g.group_type == GroupType::InvalidIsland {
            crowded.push(g);
        }
    }

    let n = grid.cells.len();
    let mut visited = vec![false; n];
    let mut invalid_islands: Vec<Group> = Vec::new();
    let mut incomplete = false;

    for start in 0..n {
        if visited[start] || grid.cells[start].state == CellState::Water {
            continue;
        }
        let g = find_group(grid, start, true, false);
        mark_visited(&mut visited, &g);
        match g.group_type {
            GroupType::InvalidIsland => invalid_islands.push(g),
            GroupType::Incomplete | GroupType::LoneBlank => incomplete = true,
            _ => {}
        }
    }

    let mut invalid_waters: Vec<Group> = Vec::new();
    let mut closed_waters: Vec<Group> = Vec::new();
    let mut target_acquired = false;
    let mut water_count = 0usize;

    for start in 0..n {
        if visited[start] || grid.cells[start].state != CellState::Water {
            continue;
        }
        let g = find_group(grid, start, true, false);
        for &m in &g.spaces {
            visited[m] = true;
        }
        water_count += 1;
        match g.group_type {
            GroupType::InvalidWater => invalid_waters.push(g),
            GroupType::ClosedWater => {
                if g.spaces.len() == grid.target {
                    target_acquired = true;
                }
                closed_waters.push(g);
            }
            _ => {}
        }
    }

    let island_error = !crowded.is_empty() || !invalid_islands.is_empty();
    let water_error = !closed_waters.is_empty() || !invalid_waters.is_empty();

    let solved = (grid.target == 0 && !island_error && !incomplete && water_count == 0)
        || (!island_error && target_acquired && water_count == 1);

    if solved {
        return (Status::Solved, Vec::new());
    }
    if !island_error && !water_error && incomplete {
        return (Status::Okay, Vec::new());
    }

    let mut flags = Vec::new();
    for g in &crowded {
        for &idx in &g.spaces {
            flags.push(flag_of(grid, idx));
        }
    }
    for g in &invalid_islands {
        for &idx in g.spaces.iter().chain(g.dofs.iter()) {
            flags.push(flag_of(grid, idx));
        }
    }
    for g in &invalid_waters {
        for &corner in &g.spaces {
            let (x, y) = grid.cells[corner].pos();
            if grid.is_puddle(x as i64, y as i64) {
                flags.push(flag_of(grid, grid.index_of(x, y)));
                flags.push(flag_of(grid, grid.index_of(x + 1, y)));
                flags.push(flag_of(grid, grid.index_of(x, y + 1)));
                flags.push(flag_of(grid, grid.index_of(x + 1, y + 1)));
            }
        }
    }

    // If the only way the grid is wrong is that the water isn't all
    // connected, every closed pond we found is water_count's entire
    // population; flag every pond except the largest one.
    let mut apart: Vec<&Group> = closed_waters.iter().collect();
    apart.sort_by_key(|g| g.spaces.len());
    if water_count > 0 && water_count == closed_waters.len() {
        apart.pop();
    }
    for g in apart {
        for &idx in &g.spaces {
            flags.push(flag_of(grid, idx));
        }
    }

    flags.sort();
    flags.dedup();
    (Status::Error, flags)
}

fn flag_of(grid: &Grid, idx: usize) -> Flag {
    let (x, y) = grid.cells[idx].pos();
    Flag {
        x: x as u16,
        y: y as u16,
    }
}
