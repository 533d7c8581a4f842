// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use tomograph_model::{instance::ProblemInstance, solution::Solution};
use tomograph_search::{
    candidates::RowCandidates, engine::TomographySolver, mode::SolveMode,
    monitor::no_op::NoOperationMonitor,
};

/// Projections of a seeded random grid, so every instance is satisfiable.
fn random_instance(rows: usize, columns: usize, density: f64, seed: u64) -> ProblemInstance {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cells: Vec<Vec<bool>> = (0..rows)
        .map(|_| (0..columns).map(|_| rng.gen_bool(density)).collect())
        .collect();
    Solution::from_bool_rows(&cells).projections()
}

fn bench_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_candidates");
    for &(width, ones) in &[(8usize, 4usize), (12, 6), (16, 8)] {
        let total = RowCandidates::new(width, ones).total().unwrap_or(0);
        group.throughput(Throughput::Elements(total as u64));
        group.bench_with_input(
            BenchmarkId::new("enumerate", format!("{}c{}", width, ones)),
            &(width, ones),
            |b, &(width, ones)| b.iter(|| RowCandidates::new(black_box(width), black_box(ones)).count()),
        );
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(20);

    for &(size, seed) in &[(4usize, 1u64), (5, 2), (6, 3)] {
        let instance = random_instance(size, size, 0.5, seed);
        let mut solver = TomographySolver::preallocated(&instance);

        group.bench_with_input(
            BenchmarkId::new("first_solution", format!("{}x{}", size, size)),
            &instance,
            |b, instance| {
                b.iter(|| {
                    solver.solve(
                        black_box(instance),
                        SolveMode::FirstSolution,
                        NoOperationMonitor::new(),
                    )
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("all_solutions", format!("{}x{}", size, size)),
            &instance,
            |b, instance| {
                b.iter(|| {
                    solver.solve(
                        black_box(instance),
                        SolveMode::AllSolutions,
                        NoOperationMonitor::new(),
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_candidates, bench_search);
criterion_main!(benches);
