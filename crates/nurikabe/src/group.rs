//! The group analyzer: flood-fills a connected component of matching cells
//! and classifies it. Two modes: *strict* (only same-colour cells) and
//! *inferred* (blanks are treated as tentatively matching, used by the
//! validator to test whether a partial solution could still work out).
//!
//! No group is cached on the cell — see the crate's design notes. Every call
//! recomputes from the current grid state and uses a stack-local visited set,
//! so re-entrant and cancelled calls can never leak a stale mark.

use crate::cell::CellState;
use crate::grid::Grid;

/// Classification of a flood-filled component.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GroupType {
    Water,
    ClosedWater,
    InvalidWater,
    LoneBlank,
    LoneIsland,
    Incomplete,
    InvalidIsland,
    Island,
}

/// A connected component plus its frontier, as found by [`find_group`].
#[derive(Clone, Debug, Default)]
pub struct Group {
    /// Cells that are part of the component itself.
    pub spaces: Vec<usize>,
    /// Blank (or, in inferred mode, unvisited) cells bordering the component.
    pub dofs: Vec<usize>,
    /// Water-side frontier of an island-mode component, or island-side
    /// frontier of a water-mode one.
    pub walls: Vec<usize>,
    /// Seed cells found inside an island-mode component.
    pub numbers: Vec<usize>,
    pub group_type: GroupType,
    pub inferred: bool,
}

fn push_unique(list: &mut Vec<usize>, present: &mut [bool], idx: usize) {
    if !present[idx] {
        present[idx] = true;
        list.push(idx);
    }
}

/// Floods from `start` and classifies the resulting component.
///
/// `inferred` widens island-mode traversal to blanks (and `Infer` marks,
/// which behave like blanks to every rule but the validator's own promotion
/// step). `remember` gates the one side effect this function performs beyond
/// reading state: in strict mode, with exactly one seed found, every member
/// has its owner set to that seed. Inferred-mode promotion of the group's
/// dofs to `Infer` happens whenever the group completes as `Island`,
/// independent of `remember`.
pub fn find_group(grid: &mut Grid, start: usize, inferred: bool, remember: bool) -> Group {
    match grid.cells[start].state {
        CellState::Water => find_water_group(grid, start),
        _ => find_island_group(grid, start, inferred, remember),
    }
}

fn find_water_group(grid: &Grid, start: usize) -> Group {
    let n = grid.cells.len();
    let mut in_spaces = vec![false; n];
    let mut in_dofs = vec![false; n];
    let mut in_walls = vec![false; n];

    let mut spaces = Vec::new();
    let mut dofs = Vec::new();
    let mut walls = Vec::new();

    let mut queue = vec![start];
    in_spaces[start] = true;
    spaces.push(start);

    while let Some(cur) = queue.pop() {
        for &nb in &grid.cells[cur].neighbors {
            match grid.cells[nb].state {
                CellState::Water => {
                    if !in_spaces[nb] {
                        in_spaces[nb] = true;
                        spaces.push(nb);
                        queue.push(nb);
                    }
                }
                CellState::Blank | CellState::Infer => push_unique(&mut dofs, &mut in_dofs, nb),
                CellState::Island | CellState::Seed(_) => {
                    push_unique(&mut walls, &mut in_walls, nb);
                }
            }
        }
    }

    let group_type = if dofs.is_empty() {
        GroupType::ClosedWater
    } else if spaces.iter().any(|&idx| {
        let (x, y) = grid.cells[idx].pos();
        grid.is_puddle(x as i64, y as i64)
    }) {
        GroupType::InvalidWater
    } else {
        GroupType::Water
    };

    Group {
        spaces,
        dofs,
        walls,
        numbers: Vec::new(),
        group_type,
        inferred: false,
    }
}

fn find_island_group(grid: &mut Grid, start: usize, inferred: bool, remember: bool) -> Group {
    let n = grid.cells.len();
    let mut visited = vec![false; n];

    let mut spaces = Vec::new();
    let mut dofs = Vec::new();
    let mut walls = Vec::new();
    let mut numbers = Vec::new();

    // A cell lands in exactly one of spaces/dofs/walls, so a single visited
    // set (rather than one per bucket) is enough to de-duplicate.
    visited[start] = true;
    match grid.cells[start].state {
        CellState::Seed(_) => {
            numbers.push(start);
            spaces.push(start);
        }
        CellState::Blank | CellState::Infer => dofs.push(start),
        _ => spaces.push(start),
    }

    let mut queue = vec![start];
    while let Some(cur) = queue.pop() {
        for &nb in &grid.cells[cur].neighbors {
            if visited[nb] {
                continue;
            }
            visited[nb] = true;
            match grid.cells[nb].state {
                CellState::Water => walls.push(nb),
                CellState::Seed(_) => {
                    spaces.push(nb);
                    numbers.push(nb);
                    queue.push(nb);
                }
                CellState::Island => {
                    spaces.push(nb);
                    queue.push(nb);
                }
                CellState::Blank | CellState::Infer => {
                    dofs.push(nb);
                    // Inferred mode tunnels through blanks looking for
                    // further island fragments and seeds beyond them.
                    if inferred {
                        queue.push(nb);
                    }
                }
            }
        }
    }

    let size = if inferred {
        dofs.len() + spaces.len()
    } else {
        spaces.len()
    };

    let mut group_type = if numbers.is_empty() {
        if !spaces.is_empty() {
            if inferred {
                GroupType::InvalidIsland
            } else {
                GroupType::LoneIsland
            }
        } else {
            GroupType::LoneBlank
        }
    } else if numbers.len() > 1 {
        if !inferred {
            GroupType::InvalidIsland
        } else {
            let sum: usize = numbers
                .iter()
                .map(|&idx| grid.cells[idx].state.seed_value().unwrap() as usize)
                .sum();
            if sum + 1 > size {
                GroupType::InvalidIsland
            } else {
                GroupType::Incomplete
            }
        }
    } else {
        let value = grid.cells[numbers[0]].state.seed_value().unwrap() as usize;
        if spaces.len() > value {
            GroupType::InvalidIsland
        } else if size == value {
            GroupType::Island
        } else if size > value {
            GroupType::Incomplete
        } else if inferred {
            GroupType::InvalidIsland
        } else {
            GroupType::Incomplete
        }
    };

    if inferred && group_type == GroupType::Island {
        for &dof in &dofs {
            grid.cells[dof].state = CellState::Infer;
        }
        spaces.append(&mut dofs);
        group_type = GroupType::Island;
    }

    if !inferred && remember {
        let owner = spaces
            .iter()
            .find_map(|&idx| grid.cells[idx].owner.filter(|&o| grid.cells[o].state.is_seed()));
        if let Some(owner) = owner {
            for &member in &spaces {
                if grid.cells[member].owner != Some(owner) {
                    grid.set_owner(member, owner);
                }
            }
        }
    }

    Group {
        spaces,
        dofs,
        walls,
        numbers,
        group_type,
        inferred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: usize, cols: usize) -> Vec<Vec<u16>> {
        vec![vec![0; cols]; rows]
    }

    #[test]
    fn single_seed_full_size_is_island() {
        let mut b = board(1, 1);
        b[0][0] = 1;
        let mut grid = Grid::new(&b);
        let g = find_group(&mut grid, 0, false, false);
        assert_eq!(g.group_type, GroupType::Island);
        assert_eq!(g.spaces, vec![0]);
    }

    #[test]
    fn seed_with_one_blank_neighbor_is_incomplete_until_grown() {
        let mut b = board(1, 3);
        b[0][0] = 2;
        let mut grid = Grid::new(&b);
        let g = find_group(&mut grid, 0, false, false);
        assert_eq!(g.group_type, GroupType::Incomplete);
        assert_eq!(g.dofs, vec![1]);
    }

    #[test]
    fn strict_overflow_is_invalid_island() {
        let mut b = board(1, 3);
        b[0][0] = 1;
        let mut grid = Grid::new(&b);
        grid.set_state(1, 0, CellState::Island).unwrap();
        let g = find_group(&mut grid, 0, false, false);
        assert_eq!(g.group_type, GroupType::InvalidIsland);
    }

    #[test]
    fn two_adjacent_seeds_strict_mode_is_invalid() {
        let mut b = board(1, 2);
        b[0][0] = 1;
        b[0][1] = 1;
        let mut grid = Grid::new(&b);
        let g = find_group(&mut grid, 0, false, false);
        assert_eq!(g.group_type, GroupType::InvalidIsland);
        assert_eq!(g.numbers.len(), 2);
    }

    #[test]
    fn remember_assigns_ownership_for_single_seed_strict_group() {
        let mut b = board(1, 2);
        b[0][0] = 2;
        let mut grid = Grid::new(&b);
        grid.set_state(1, 0, CellState::Island).unwrap();
        let _ = find_group(&mut grid, 0, false, true);
        assert_eq!(grid.cells[1].owner, Some(0));
        assert!(grid.cells[0].owns.contains(&1));
    }

    #[test]
    fn inferred_island_promotes_dofs_to_infer() {
        let mut b = board(1, 2);
        b[0][0] = 2;
        let mut grid = Grid::new(&b);
        let g = find_group(&mut grid, 0, true, false);
        assert_eq!(g.group_type, GroupType::Island);
        assert_eq!(grid.cells[1].state, CellState::Infer);
    }

    #[test]
    fn closed_water_has_no_dofs() {
        let mut b = board(1, 1);
        b[0][0] = 0;
        let mut grid = Grid::new(&b);
        grid.set_state(0, 0, CellState::Water).unwrap();
        let g = find_group(&mut grid, 0, false, false);
        assert_eq!(g.group_type, GroupType::ClosedWater);
        assert!(g.dofs.is_empty());
    }

    #[test]
    fn water_group_with_blank_dof_is_open_water() {
        let mut grid = Grid::new(&board(1, 2));
        grid.set_state(0, 0, CellState::Water).unwrap();
        let g = find_group(&mut grid, 0, false, false);
        assert_eq!(g.group_type, GroupType::Water);
        assert_eq!(g.dofs, vec![1]);
    }

    #[test]
    fn lone_blank_component_has_no_numbers_or_islands() {
        let mut grid = Grid::new(&board(2, 2));
        let g = find_group(&mut grid, 0, true, false);
        assert_eq!(g.group_type, GroupType::LoneBlank);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // No group is ever cached on a cell, so calling `find_group` in
            // strict, non-remembering mode twice in a row without any
            // mutation in between must yield the same classification both
            // times, whatever the seed's value or the board's width.
            #[test]
            fn prop_find_group_is_idempotent_without_mutation(
                value in 1u16..8,
                width in 1usize..6,
            ) {
                let mut b = board(1, width);
                b[0][0] = value;
                let mut grid = Grid::new(&b);

                let first = find_group(&mut grid, 0, false, false);
                let second = find_group(&mut grid, 0, false, false);
                prop_assert_eq!(first.group_type, second.group_type);
                prop_assert_eq!(first.spaces, second.spaces);
                prop_assert_eq!(first.dofs, second.dofs);
            }
        }
    }
}
