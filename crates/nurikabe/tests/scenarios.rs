//! End-to-end scenarios exercising the full pipeline (`setup`, `process_all`,
//! guessing) against boards small enough to reason about by hand.

use nurikabe::cell::CellState;
use nurikabe::change::{NullSink, Verdict};
use nurikabe::config::SolverConfig;
use nurikabe::grid::Grid;
use nurikabe::solver::Solver;
use nurikabe::validator::{check, Status};

fn empty_board(rows: usize, cols: usize) -> Vec<Vec<u16>> {
    vec![vec![0; cols]; rows]
}

fn new_solver(board: &[Vec<u16>]) -> Solver<NullSink> {
    Solver::new(Grid::new(board), SolverConfig::default(), NullSink)
}

#[test]
fn trivial_5x5_single_seed_solves_with_full_water_count() {
    let mut b = empty_board(5, 5);
    b[2][2] = 1;
    let mut solver = new_solver(&b);
    assert_eq!(solver.solve(), Verdict::Solved);

    let water_count = solver
        .grid
        .cells
        .iter()
        .filter(|c| c.state == CellState::Water)
        .count();
    assert_eq!(water_count, solver.grid.target);
    assert_eq!(water_count, 24);

    for (dx, dy) in [(1i64, 0i64), (-1, 0), (0, 1), (0, -1)] {
        assert_eq!(
            solver.grid.get_state(2 + dx, 2 + dy).unwrap(),
            CellState::Water
        );
    }
}

#[test]
fn two_seed_5x5_board_reaches_a_solved_verdict() {
    let mut b = empty_board(5, 5);
    b[0][0] = 5;
    b[4][4] = 5;
    let mut solver = new_solver(&b);
    assert_eq!(solver.solve(), Verdict::Solved);
}

#[test]
fn two_adjacent_unit_seeds_are_flagged_as_contradictory() {
    let mut b = empty_board(3, 3);
    b[0][0] = 1;
    b[0][1] = 1;
    let mut grid = Grid::new(&b);
    let (status, flags) = check(&mut grid);
    assert_eq!(status, Status::Error);
    assert!(flags.iter().any(|f| f.x == 0 && f.y == 0));
    assert!(flags.iter().any(|f| f.x == 1 && f.y == 0));
}

#[test]
fn anti_puddle_rule_forces_the_corner_before_any_island_completes() {
    let mut b = empty_board(4, 4);
    b[0][0] = 2;
    b[3][3] = 2;
    let mut solver = new_solver(&b);
    solver.grid.set_state(1, 1, CellState::Water).unwrap();
    solver.grid.set_state(1, 2, CellState::Water).unwrap();
    solver.grid.set_state(2, 1, CellState::Water).unwrap();

    solver.process_all();

    assert!(solver.grid.get_state(2, 2).unwrap().is_island());
}

#[test]
fn water_barrier_forces_unreachable_corners_to_water() {
    let mut b = empty_board(5, 5);
    b[0][0] = 2;
    b[4][4] = 3;
    let mut solver = new_solver(&b);
    for x in 0..5 {
        solver.grid.set_state(x, 2, CellState::Water).unwrap();
    }

    solver.process_all();

    // Neither seed's remaining budget reaches across the barrier to the
    // opposite far corner, so both ought to be forced water.
    assert_eq!(solver.grid.get_state(0, 4).unwrap(), CellState::Water);
    assert_eq!(solver.grid.get_state(4, 0).unwrap(), CellState::Water);
}

#[test]
fn disconnected_fragment_is_chained_back_to_its_seed() {
    let mut b = empty_board(7, 7);
    b[3][3] = 4;
    let mut solver = new_solver(&b);

    let seed_idx = solver.grid.index_of(3, 3);
    solver.grid.set_state(3, 6, CellState::Island).unwrap();

    solver.process_all();

    assert!(solver.grid.get_state(3, 4).unwrap().is_island());
    assert!(solver.grid.get_state(3, 5).unwrap().is_island());
    assert_eq!(
        solver.grid.cells[solver.grid.index_of(3, 4)].owner,
        Some(seed_idx)
    );
    assert_eq!(
        solver.grid.cells[solver.grid.index_of(3, 5)].owner,
        Some(seed_idx)
    );
}
