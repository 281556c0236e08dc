//! The reachability engine: for every seed, works out which blanks could
//! still end up belonging to it, and — for islands split into disconnected
//! fragments — tries to find the connecting paths between them.

use std::collections::VecDeque;

use crate::cell::CellState;
use crate::config::SolverConfig;
use crate::grid::Grid;
use crate::group::{find_group, Group};

/// Breadth-first search from `dofs` bounded by `start_depth`, walking any
/// neighbor that isn't a foreign-owned island — blanks, `Infer` marks, cells
/// already owned by `owner`, and unowned anonymous `Island` fragments alike.
/// Stops at (and never crosses) a cell bordering an island owned by a
/// different seed. Returns every cell that could still be reached and is not
/// yet owned by anyone else — the caller appends `owner` to each one's
/// reacher list.
fn reaches(grid: &Grid, dofs: &[usize], owner: usize, start_depth: i64) -> Vec<usize> {
    let n = grid.cells.len();
    let mut processed = vec![false; n];
    let mut can_reach = Vec::new();

    let mut queue: VecDeque<(usize, i64)> = dofs.iter().map(|&d| (d, start_depth)).collect();
    let mut queued = vec![false; n];
    for &d in dofs {
        queued[d] = true;
    }

    while let Some((idx, depth)) = queue.pop_front() {
        if processed[idx] {
            continue;
        }
        processed[idx] = true;

        if depth <= 0 {
            continue;
        }
        if let Some(o) = grid.cells[idx].owner {
            if o != owner {
                continue;
            }
        }

        let mut clash = false;
        for &nb in &grid.cells[idx].neighbors {
            let nb_cell = &grid.cells[nb];
            let foreign_island = nb_cell.state.is_island()
                && nb_cell.owner.is_some_and(|o| o != owner);
            if foreign_island {
                clash = true;
            } else if !processed[nb] && !queued[nb] {
                // Not just blanks/`Infer` — an unowned anonymous `Island`
                // fragment is walked too, so it can pick up a reacher and
                // later be adopted by `process_all`'s single-reacher rule.
                queued[nb] = true;
                queue.push_back((nb, depth - 1));
            }
        }

        if !clash && grid.cells[idx].owner.is_none() {
            can_reach.push(idx);
        }
    }

    can_reach
}

/// Recursive chain search: enumerates every simple path of length `<= left`
/// from `this` to `goal` through blank/`Infer` cells, aborting a branch as
/// soon as it touches another seed's island. `used` accumulates the plain
/// blank cells walked (not the temporarily `Infer`-marked owned cells).
fn chain(
    grid: &Grid,
    this: usize,
    goal: usize,
    left: i64,
    used: &[usize],
    chains: &mut Vec<Vec<usize>>,
) {
    if this == goal {
        chains.push(used.to_vec());
        return;
    }
    if left < grid.manhattan(this, goal) {
        return;
    }
    for &nb in &grid.cells[this].neighbors {
        if grid.cells[nb].state.is_island() {
            return;
        }
    }
    for &nb in &grid.cells[this].neighbors {
        if matches!(grid.cells[nb].state, CellState::Blank | CellState::Infer) {
            if grid.cells[this].state == CellState::Blank {
                let mut next_used = used.to_vec();
                next_used.push(this);
                chain(grid, nb, goal, left - 1, &next_used, chains);
            } else {
                chain(grid, nb, goal, left - 1, used, chains);
            }
        }
    }
}

/// Plain single-fragment reach for a seed: used both when a seed's island
/// hasn't split at all, and as the fallback when it has split into more
/// fragments (or needs a longer chain) than this engine is willing to
/// enumerate paths for.
fn naive_reach(grid: &mut Grid, seed: usize, primary: &Group) {
    let value = grid.cells[seed].state.seed_value().unwrap() as i64;
    let depth = value - primary.spaces.len() as i64;
    for space in reaches(grid, &primary.dofs, seed, depth) {
        grid.cells[space]
            .reachers
            .get_or_insert_with(Vec::new)
            .push(seed);
    }
}

/// Recomputes reacher lists for every unowned cell, then assigns reachers for
/// each seed. Seeds whose island has split into disconnected fragments are
/// chained back together when feasible; cells common to every viable chain
/// are forced islands, returned as `(cell, seed)` pairs.
pub fn calculate_reachers(grid: &mut Grid, config: &SolverConfig) -> Vec<(usize, usize)> {
    for idx in 0..grid.cells.len() {
        if grid.cells[idx].owner.is_none() {
            grid.cells[idx].reachers = Some(Vec::new());
        }
    }

    let seeds = grid.seeds.clone();
    let mut primary_groups = Vec::with_capacity(seeds.len());
    for &seed in &seeds {
        primary_groups.push(find_group(grid, seed, false, true));
    }

    // Seeds whose `owns` list holds cells outside their primary fragment have
    // a disconnected island that needs chaining.
    let mut forced = Vec::new();
    for (i, &seed) in seeds.iter().enumerate() {
        let primary = &primary_groups[i];
        let mut extra: Vec<usize> = grid.cells[seed]
            .owns
            .iter()
            .copied()
            .filter(|c| !primary.spaces.contains(c))
            .collect();

        if extra.is_empty() {
            naive_reach(grid, seed, primary);
            continue;
        }

        // Partition the leftover owned cells into their own connected
        // fragments. More than one extra fragment (three or more groups in
        // total) is left to the naive per-fragment reach below — chaining
        // is only attempted between exactly two pieces.
        let mut fragments: Vec<Group> = Vec::new();
        while let Some(&start) = extra.first() {
            let frag = find_group(grid, start, false, false);
            extra.retain(|c| !frag.spaces.contains(c));
            fragments.push(frag);
        }
        if fragments.len() > 1 {
            naive_reach(grid, seed, primary);
            continue;
        }
        let fragment = fragments.into_iter().next().unwrap();

        let value = grid.cells[seed].state.seed_value().unwrap() as i64;
        let left = value - primary.spaces.len() as i64 - fragment.spaces.len() as i64 + 1;

        if left > config.max_chain_left as i64 {
            naive_reach(grid, seed, primary);
            continue;
        }

        // Temporarily re-mark the seed's owned cells as `Infer` so the
        // chain walk can distinguish them from other islands' territory.
        let owns = grid.cells[seed].owns.clone();
        for &c in &owns {
            grid.cells[c].state = CellState::Infer;
        }

        let mut chains = Vec::new();
        for &origin in &primary.spaces {
            for &target in &fragment.spaces {
                chain(grid, origin, target, left, &[], &mut chains);
            }
        }

        for &c in &owns {
            grid.cells[c].state = CellState::Island;
        }
        grid.cells[seed].state = CellState::Seed(value as u16);

        if chains.is_empty() {
            naive_reach(grid, seed, primary);
            continue;
        }

        let mut actually_can_reach: Vec<usize> = Vec::new();
        for path in &chains {
            for &c in path {
                grid.cells[c].state = CellState::Island;
            }
            let chained_group = find_group(grid, seed, false, false);
            let depth = value - chained_group.spaces.len() as i64;
            let reach = reaches(grid, &chained_group.dofs, seed, depth);
            for &r in &reach {
                if !actually_can_reach.contains(&r) {
                    actually_can_reach.push(r);
                }
            }
            for &c in path {
                grid.cells[c].state = CellState::Blank;
                grid.cells[c].reachers = Some(Vec::new());
            }
            for &r in &reach {
                if !actually_can_reach.contains(&r) {
                    actually_can_reach.push(r);
                }
            }
        }
        for path in &chains {
            for &c in path {
                if !actually_can_reach.contains(&c) {
                    actually_can_reach.push(c);
                }
            }
        }

        for &space in &actually_can_reach {
            grid.cells[space]
                .reachers
                .get_or_insert_with(Vec::new)
                .push(seed);
        }

        let mut definite: Vec<usize> = chains[0].clone();
        for path in &chains[1..] {
            definite.retain(|c| path.contains(c));
        }
        for cell in definite {
            forced.push((cell, seed));
        }
    }

    forced
}

/// The "good pair" rule: for every 2x2 square of exactly two adjacent waters
/// and two adjacent blanks both reachable only by the same seed, attempts to
/// chain that seed to each blank. Cells that show up in every chain to one
/// blank, or in the other blank's chains, are forced islands.
pub fn from_good_pairs(grid: &mut Grid, config: &SolverConfig) -> Vec<(usize, usize)> {
    let mut forced = Vec::new();
    if grid.width == 0 || grid.height == 0 {
        return forced;
    }

    for y in 0..grid.height - 1 {
        for x in 0..grid.width - 1 {
            let Some((b1, b2, seed)) = good_pair(grid, x, y) else {
                continue;
            };

            let group = find_group(grid, seed, false, true);
            let value = grid.cells[seed].state.seed_value().unwrap() as i64;
            let left = value - group.spaces.len() as i64 + 1;
            if left >= config.max_chain_left as i64 {
                continue;
            }

            let owns = grid.cells[seed].owns.clone();
            for &c in &owns {
                grid.cells[c].state = CellState::Infer;
            }

            let mut overlaps = Vec::new();
            for &target in &[b1, b2] {
                let mut chains = Vec::new();
                chain(grid, seed, target, left, &[], &mut chains);
                if chains.is_empty() {
                    overlaps.push(Vec::new());
                } else {
                    let mut common = chains[0].clone();
                    for path in &chains[1..] {
                        common.retain(|c| path.contains(c));
                    }
                    overlaps.push(common);
                }
            }

            for &c in &owns {
                grid.cells[c].state = CellState::Island;
            }
            grid.cells[seed].state = CellState::Seed(value as u16);

            let mut necessary: Vec<usize> = overlaps[0]
                .iter()
                .copied()
                .filter(|c| overlaps[1].contains(c))
                .collect();
            if overlaps[1].contains(&b1) {
                necessary.push(b1);
            }
            if overlaps[0].contains(&b2) {
                necessary.push(b2);
            }
            necessary.sort_unstable();
            necessary.dedup();
            for cell in necessary {
                forced.push((cell, seed));
            }
        }
    }

    forced
}

fn good_pair(grid: &Grid, x: usize, y: usize) -> Option<(usize, usize, usize)> {
    let corners = [
        grid.index_of(x, y),
        grid.index_of(x + 1, y),
        grid.index_of(x, y + 1),
        grid.index_of(x + 1, y + 1),
    ];

    let mut waters = 0;
    let mut blanks = Vec::new();
    for &c in &corners {
        match grid.cells[c].state {
            CellState::Water => waters += 1,
            CellState::Blank => blanks.push(c),
            _ => return None,
        }
    }
    if waters != 2 || blanks.len() != 2 {
        return None;
    }

    let (b1, b2) = (blanks[0], blanks[1]);
    let r1 = grid.cells[b1].reachers.as_ref()?;
    let r2 = grid.cells[b2].reachers.as_ref()?;
    if r1.len() != 1 || r2.len() != 1 || r1[0] != r2[0] {
        return None;
    }
    let (x1, y1) = grid.cells[b1].pos();
    let (x2, y2) = grid.cells[b2].pos();
    if x1 == x2 || y1 == y2 {
        return None;
    }
    Some((b1, b2, r1[0]))
}
