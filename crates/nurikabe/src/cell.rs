//! Cell state and the per-cell arena record.

use serde::{Deserialize, Serialize};

/// Tagged state of a single grid cell. `Seed` is immutable once placed; every
/// other variant is freely reassignable by `Grid::set_state`/the solver's `alter`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum CellState {
    Blank,
    Water,
    /// Anonymous island mark — not yet (or no longer) attributed to a seed.
    Island,
    /// Transient island mark introduced by inferred-mode validation; promoted
    /// back to `Island` by the propagator once it is safe to commit to it.
    Infer,
    /// A clue cell. `n` is the island size it must anchor, `n >= 1`.
    Seed(u16),
}

impl CellState {
    #[must_use]
    pub fn is_seed(self) -> bool {
        matches!(self, CellState::Seed(_))
    }

    /// True for cells that count as a *committed* island mark: anonymous
    /// island marks and seeds. Deliberately excludes `Infer` — a transient
    /// mark behaves like a blank to every rule except the validator's own
    /// promotion step, exactly as in the original engine (whose `is_island`
    /// checks `state == ISLAND`, not the separate `INFER` sentinel).
    #[must_use]
    pub fn is_island(self) -> bool {
        matches!(self, CellState::Island | CellState::Seed(_))
    }

    #[must_use]
    pub fn seed_value(self) -> Option<u16> {
        match self {
            CellState::Seed(n) => Some(n),
            _ => None,
        }
    }
}

/// One cell of the arena. Neighbors, owner, and owned cells are arena indices,
/// never pointers, so the cell graph carries no cycles at the type level.
#[derive(Clone, Debug)]
pub struct Cell {
    pub x: u16,
    pub y: u16,
    pub state: CellState,
    /// Orthogonal neighbors, 2 to 4 of them depending on grid position.
    pub neighbors: Vec<usize>,
    /// Seed index that owns this cell, if attributed. Water cells own themselves.
    pub owner: Option<usize>,
    /// For seed cells: every cell (including itself) attributed to this seed.
    pub owns: Vec<usize>,
    /// For unowned blanks and anonymous islands: seeds that could still reach
    /// this cell. `None` for owned cells and for seeds themselves, which are
    /// reacher-less by convention.
    pub reachers: Option<Vec<usize>>,
    /// Guess-order hint: the colour a prior depth-1 trial found this cell
    /// preferred, used to order which alternative is tried first next time.
    pub flag: Option<CellState>,
}

impl Cell {
    pub(crate) fn new(x: u16, y: u16, state: CellState) -> Self {
        let is_seed = state.is_seed();
        Self {
            x,
            y,
            state,
            neighbors: Vec::new(),
            owner: None,
            owns: Vec::new(),
            reachers: if is_seed { None } else { Some(Vec::new()) },
            flag: None,
        }
    }

    #[must_use]
    pub fn pos(&self) -> (usize, usize) {
        (self.x as usize, self.y as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_island_and_reacher_less() {
        let c = Cell::new(0, 0, CellState::Seed(3));
        assert!(c.state.is_seed());
        assert!(c.state.is_island());
        assert_eq!(c.reachers, None);
    }

    #[test]
    fn blank_starts_with_empty_reacher_list() {
        let c = Cell::new(1, 1, CellState::Blank);
        assert!(!c.state.is_seed());
        assert_eq!(c.reachers, Some(Vec::new()));
    }

    #[test]
    fn infer_is_not_a_committed_island_mark() {
        assert!(!CellState::Infer.is_island());
        assert!(!CellState::Water.is_island());
        assert!(!CellState::Blank.is_island());
        assert!(CellState::Island.is_island());
    }
}
