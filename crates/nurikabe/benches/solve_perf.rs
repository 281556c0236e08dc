//! Benchmark: measure solve() cost across a few representative board shapes.
//!
//! Target: the 7x7 multi-seed board (the largest fixture in this benchmark)
//! should complete well under a second, leaving room for interactive use in
//! a puzzle generator's feedback loop.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nurikabe::change::NullSink;
use nurikabe::config::SolverConfig;
use nurikabe::grid::Grid;
use nurikabe::solver::Solver;

fn board(rows: &[&[u16]]) -> Vec<Vec<u16>> {
    rows.iter().map(|r| r.to_vec()).collect()
}

/// 1x1, solved by setup alone — baseline cost of constructing a `Solver`.
fn bench_solve_trivial(c: &mut Criterion) {
    c.bench_function("solve_trivial_1x1", |b| {
        b.iter_batched(
            || Grid::new(&board(&[&[1]])),
            |grid| {
                let mut solver = Solver::new(grid, SolverConfig::default(), NullSink);
                solver.solve();
                black_box(&solver.grid);
            },
            BatchSize::SmallInput,
        );
    });
}

/// 5x5 two-seed board — exercises propagation without needing a guess.
fn bench_solve_5x5_two_seed(c: &mut Criterion) {
    c.bench_function("solve_5x5_two_seed", |b| {
        b.iter_batched(
            || {
                Grid::new(&board(&[
                    &[3, 0, 0, 0, 0],
                    &[0, 0, 0, 0, 0],
                    &[0, 0, 0, 0, 0],
                    &[0, 0, 0, 0, 0],
                    &[0, 0, 0, 0, 4],
                ]))
            },
            |grid| {
                let mut solver = Solver::new(grid, SolverConfig::default(), NullSink);
                solver.solve();
                black_box(&solver.grid);
            },
            BatchSize::SmallInput,
        );
    });
}

/// 7x7 multi-fragment board — forces chain enumeration in `calculate_reachers`.
fn bench_solve_7x7_multi_fragment(c: &mut Criterion) {
    c.bench_function("solve_7x7_multi_fragment", |b| {
        b.iter_batched(
            || {
                Grid::new(&board(&[
                    &[5, 0, 0, 0, 0, 0, 3],
                    &[0, 0, 0, 0, 0, 0, 0],
                    &[0, 0, 2, 0, 0, 0, 0],
                    &[0, 0, 0, 0, 0, 0, 0],
                    &[0, 0, 0, 0, 1, 0, 0],
                    &[0, 0, 0, 0, 0, 0, 0],
                    &[4, 0, 0, 0, 0, 0, 2],
                ]))
            },
            |grid| {
                let mut solver = Solver::new(grid, SolverConfig::default(), NullSink);
                solver.solve();
                black_box(&solver.grid);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_solve_trivial,
    bench_solve_5x5_two_seed,
    bench_solve_7x7_multi_fragment,
);
criterion_main!(benches);
