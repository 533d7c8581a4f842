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

//! # Configured solver
//!
//! `Solver` wraps `TomographySolver` with the monitors a caller usually
//! wants and an optional parallel mode.
//!
//! ## Highlights
//!
//! - Totals check: when row and column sums disagree the instance is
//!   reported `Unsatisfiable` with `TerminationReason::InfeasibilityProven`
//!   without running the search (on by default).
//! - Monitors: per run a `CompositeTreeSearchMonitor` with interrupt,
//!   solution-limit, time-limit and progress-log monitors as configured.
//! - Parallel fan-out:
//!   - The children of the empty matrix are split into contiguous chunks in
//!     the order the engine would explore them.
//!   - Each chunk runs on its own engine in a `std::thread::scope` thread.
//!   - Results are concatenated in chunk order. In `FirstSolution` mode a
//!     chunk that finds a solution cancels the chunks after it, never the
//!     ones before, so the reported solution is the sequential one.
//!
//! ## Usage
//!
//! ```rust
//! use tomograph_search::mode::SolveMode;
//! use tomograph_solver::solver::SolverBuilder;
//!
//! let solver = SolverBuilder::new()
//!     .with_mode(SolveMode::AllSolutions)
//!     .with_threads(2)
//!     .build();
//!
//! let outcome = solver.solve_targets(vec![1, 1], vec![1, 1]).expect("valid targets");
//! assert_eq!(outcome.num_solutions(), 2);
//! ```

use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::{Duration, Instant},
};
use tomograph_model::{
    instance::{InstanceError, ProblemInstance},
    solution::Solution,
};
use tomograph_search::{
    engine::{TomographySolver, children},
    mode::SolveMode,
    monitor::{
        composite::CompositeTreeSearchMonitor,
        interrupt::InterruptMonitor,
        log::LogTreeSearchMonitor,
        solution_limit::SolutionLimitMonitor,
        time_limit::TimeLimitMonitor,
        tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    },
    node::PartialMatrix,
    result::{SolverOutcome, SolverResult, TerminationReason},
    stats::SearchStatistics,
};
use tracing::{debug, info};

/// Clock checks of the progress log happen every 4096 steps.
const LOG_CLOCK_CHECK_MASK: u64 = 4095;

/// Stops a chunk once a chunk before it has found a solution.
struct EarlierChunkSolvedMonitor<'a> {
    chunk: usize,
    lowest_solved: &'a AtomicUsize,
}

impl TreeSearchMonitor for EarlierChunkSolvedMonitor<'_> {
    fn name(&self) -> &str {
        "EarlierChunkSolvedMonitor"
    }

    fn on_enter_search(&mut self, _instance: &ProblemInstance, _statistics: &SearchStatistics) {}

    fn on_exit_search(&mut self, _statistics: &SearchStatistics) {}

    fn search_command(&mut self, _statistics: &SearchStatistics) -> SearchCommand {
        if self.lowest_solved.load(Ordering::Relaxed) < self.chunk {
            SearchCommand::Terminate("Solution found in an earlier chunk".to_string())
        } else {
            SearchCommand::Continue
        }
    }

    fn on_solution_found(
        &mut self,
        _solution: &Solution,
        _statistics: &SearchStatistics,
    ) {
        self.lowest_solved.fetch_min(self.chunk, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone)]
pub struct Solver<'a> {
    mode: SolveMode,
    time_limit: Option<Duration>,
    solution_limit: Option<u64>,
    threads: usize,
    sum_check: bool,
    progress_log: Option<Duration>,
    interrupt: Option<&'a AtomicBool>,
}

impl<'a> Solver<'a> {
    #[inline]
    pub fn mode(&self) -> SolveMode {
        self.mode
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn solution_limit(&self) -> Option<u64> {
        self.solution_limit
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    #[inline]
    pub fn sum_check(&self) -> bool {
        self.sum_check
    }

    /// Validates the targets and solves the resulting instance.
    pub fn solve_targets(
        &self,
        row_targets: Vec<usize>,
        column_targets: Vec<usize>,
    ) -> Result<SolverOutcome, InstanceError> {
        let instance = ProblemInstance::new(row_targets, column_targets)?;
        Ok(self.solve(&instance))
    }

    pub fn solve(&self, instance: &ProblemInstance) -> SolverOutcome {
        let start_time = Instant::now();

        if self.sum_check && !instance.has_consistent_totals() {
            info!(
                row_ones = instance.total_row_ones(),
                column_ones = instance.total_column_ones(),
                "row and column totals differ; skipping search"
            );
            let mut stats = SearchStatistics::default();
            stats.set_total_time(start_time.elapsed());
            return SolverOutcome::infeasible(stats);
        }

        let outcome = if self.threads > 1 && instance.num_rows() > 0 {
            self.solve_parallel(instance, start_time)
        } else {
            self.solve_sequential(instance)
        };

        debug!(
            result = %outcome.result(),
            termination = %outcome.termination_reason(),
            elapsed = ?start_time.elapsed(),
            "solve finished"
        );
        outcome
    }

    fn solve_sequential(&self, instance: &ProblemInstance) -> SolverOutcome {
        let monitor = self.build_monitor(None);
        TomographySolver::preallocated(instance).solve(instance, self.mode, monitor)
    }

    /// Builds the monitor stack for one engine run. Stop conditions come
    /// first so the composite can short-circuit on them.
    fn build_monitor<'m>(
        &self,
        chunk: Option<(usize, &'m AtomicUsize)>,
    ) -> CompositeTreeSearchMonitor<'m>
    where
        'a: 'm,
    {
        let mut monitor = CompositeTreeSearchMonitor::with_capacity(5);

        if let Some(flag) = self.interrupt {
            monitor.add_monitor(InterruptMonitor::new(flag));
        }
        if let Some((chunk, lowest_solved)) = chunk {
            monitor.add_monitor(EarlierChunkSolvedMonitor {
                chunk,
                lowest_solved,
            });
        }
        if let Some(limit) = self.solution_limit {
            monitor.add_monitor(SolutionLimitMonitor::new(limit));
        }
        if let Some(limit) = self.time_limit {
            monitor.add_monitor(TimeLimitMonitor::with_default_check_interval(limit));
        }
        if let Some(interval) = self.progress_log {
            monitor.add_monitor(LogTreeSearchMonitor::new(interval, LOG_CLOCK_CHECK_MASK));
        }

        monitor
    }

    /// Splits the first row's candidates into chunks in exploration order.
    /// Each chunk is returned in push order, ready for `solve_from`.
    fn split_roots(&self, instance: &ProblemInstance) -> Vec<Vec<PartialMatrix>> {
        let mut exploration_order = children(&PartialMatrix::empty(instance.num_columns()), instance);
        exploration_order.reverse();

        let num_chunks = self.threads.min(exploration_order.len()).max(1);
        let chunk_size = exploration_order.len().div_ceil(num_chunks).max(1);

        let mut chunks = Vec::with_capacity(num_chunks);
        let mut nodes = exploration_order.into_iter().peekable();
        while nodes.peek().is_some() {
            let mut chunk: Vec<PartialMatrix> = nodes.by_ref().take(chunk_size).collect();
            chunk.reverse();
            chunks.push(chunk);
        }
        chunks
    }

    fn solve_parallel(&self, instance: &ProblemInstance, start_time: Instant) -> SolverOutcome {
        let chunks = self.split_roots(instance);
        debug!(
            threads = self.threads,
            chunks = chunks.len(),
            roots = chunks.iter().map(Vec::len).sum::<usize>(),
            "parallel fan-out"
        );

        let lowest_solved = AtomicUsize::new(usize::MAX);
        let track_first = !self.mode.continues_after_solution();
        let mode = self.mode;

        let outcomes: Vec<SolverOutcome> = std::thread::scope(|scope| {
            let handles: Vec<_> = chunks
                .into_iter()
                .enumerate()
                .map(|(index, roots)| {
                    let lowest_solved = &lowest_solved;
                    scope.spawn(move || {
                        let cancel = track_first.then_some((index, lowest_solved));
                        let monitor = self.build_monitor(cancel);
                        TomographySolver::new().solve_from(instance, roots, mode, monitor)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });

        self.merge_outcomes(outcomes, start_time)
    }

    /// Combines per-chunk outcomes, in chunk order, into the outcome of a
    /// single run over the whole tree.
    fn merge_outcomes(&self, outcomes: Vec<SolverOutcome>, start_time: Instant) -> SolverOutcome {
        let mut stats = SearchStatistics::default();
        let mut solutions = Vec::new();
        let mut abort_reason: Option<String> = None;
        let mut first_found = false;

        for outcome in outcomes {
            let (result, reason, chunk_stats) = outcome.into_parts();
            stats.merge(&chunk_stats);

            if first_found {
                continue;
            }
            if let TerminationReason::Aborted(msg) = reason
                && abort_reason.is_none()
            {
                abort_reason = Some(msg);
            }

            if let SolverResult::Satisfiable(found) = result {
                solutions.extend(found);
                if !self.mode.continues_after_solution() {
                    first_found = true;
                }
            }
        }

        // A first-solution run stops on acceptance before any limit is consulted.
        if !first_found && let Some(limit) = self.solution_limit {
            let limit = usize::try_from(limit).unwrap_or(usize::MAX);
            if solutions.len() >= limit {
                solutions.truncate(limit);
                abort_reason = Some(format!("Solution limit of {} reached", limit));
            }
        }

        stats.set_total_time(start_time.elapsed());

        match abort_reason {
            Some(msg) => SolverOutcome::aborted(solutions, msg, stats),
            None if first_found => SolverOutcome::solution_found(solutions, stats),
            None => SolverOutcome::exhausted(solutions, stats),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SolverBuilder<'a> {
    mode: SolveMode,
    time_limit: Option<Duration>,
    solution_limit: Option<u64>,
    threads: usize,
    sum_check: bool,
    progress_log: Option<Duration>,
    interrupt: Option<&'a AtomicBool>,
}

impl Default for SolverBuilder<'_> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> SolverBuilder<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            mode: SolveMode::FirstSolution,
            time_limit: None,
            solution_limit: None,
            threads: 1,
            sum_check: true,
            progress_log: None,
            interrupt: None,
        }
    }

    #[inline]
    pub fn with_mode(mut self, mode: SolveMode) -> Self {
        self.mode = mode;
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_solution_limit(mut self, limit: u64) -> Self {
        self.solution_limit = Some(limit);
        self
    }

    /// Number of worker threads. `0` uses every available core.
    #[inline]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = if threads == 0 {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        } else {
            threads
        };
        self
    }

    /// Enables or disables the up-front comparison of row and column totals.
    #[inline]
    pub fn with_sum_check(mut self, enabled: bool) -> Self {
        self.sum_check = enabled;
        self
    }

    /// Logs search progress through `tracing` at most once per `interval`.
    #[inline]
    pub fn with_progress_log(mut self, interval: Duration) -> Self {
        self.progress_log = Some(interval);
        self
    }

    /// Stops every run once `flag` is set.
    #[inline]
    pub fn with_interrupt(mut self, flag: &'a AtomicBool) -> Self {
        self.interrupt = Some(flag);
        self
    }

    #[inline]
    pub fn build(self) -> Solver<'a> {
        Solver {
            mode: self.mode,
            time_limit: self.time_limit,
            solution_limit: self.solution_limit,
            threads: self.threads,
            sum_check: self.sum_check,
            progress_log: self.progress_log,
            interrupt: self.interrupt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rustc_hash::FxHashSet;
    use tomograph_model::index::RowIndex;

    fn instance(rows: Vec<usize>, columns: Vec<usize>) -> ProblemInstance {
        ProblemInstance::new(rows, columns).expect("valid instance")
    }

    fn random_instance(rng: &mut ChaCha8Rng, rows: usize, columns: usize) -> ProblemInstance {
        let cells: Vec<Vec<bool>> = (0..rows)
            .map(|_| (0..columns).map(|_| rng.gen_bool(0.5)).collect())
            .collect();
        Solution::from_bool_rows(&cells).projections()
    }

    #[test]
    fn test_defaults() {
        let solver = SolverBuilder::new().build();
        assert_eq!(solver.mode(), SolveMode::FirstSolution);
        assert_eq!(solver.threads(), 1);
        assert!(solver.sum_check());
        assert_eq!(solver.time_limit(), None);
        assert_eq!(solver.solution_limit(), None);
        assert!(SolverBuilder::new().with_threads(0).build().threads() >= 1);
    }

    #[test]
    fn test_solve_targets_validates() {
        let solver = SolverBuilder::new().build();
        assert_eq!(
            solver.solve_targets(vec![5], vec![1, 1]).unwrap_err(),
            InstanceError::RowTargetExceedsWidth {
                row: RowIndex::new(0),
                target: 5,
                width: 2
            }
        );
    }

    #[test]
    fn test_sum_check_short_circuits() {
        let inst = instance(vec![1, 1], vec![2, 1]);

        let checked = SolverBuilder::new().build().solve(&inst);
        assert!(checked.is_unsatisfiable());
        assert_eq!(
            checked.termination_reason(),
            &TerminationReason::InfeasibilityProven
        );
        assert_eq!(checked.statistics().nodes_explored, 0);

        let searched = SolverBuilder::new().with_sum_check(false).build().solve(&inst);
        assert!(searched.is_unsatisfiable());
        assert_eq!(
            searched.termination_reason(),
            &TerminationReason::SearchExhausted
        );
        assert!(searched.statistics().nodes_explored > 0);
    }

    #[test]
    fn test_parallel_all_solutions_equal_sequential() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        for _ in 0..15 {
            let rows = rng.gen_range(1..=5);
            let columns = rng.gen_range(1..=5);
            let inst = random_instance(&mut rng, rows, columns);

            let sequential = SolverBuilder::new()
                .with_mode(SolveMode::AllSolutions)
                .build()
                .solve(&inst);

            for threads in [2, 3, 8] {
                let parallel = SolverBuilder::new()
                    .with_mode(SolveMode::AllSolutions)
                    .with_threads(threads)
                    .build()
                    .solve(&inst);
                assert_eq!(parallel.solutions(), sequential.solutions(), "{} threads on {}", threads, inst);
                assert_eq!(parallel.termination_reason(), &TerminationReason::SearchExhausted);
            }
        }
    }

    #[test]
    fn test_parallel_first_solution_equals_sequential() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..15 {
            let inst = random_instance(&mut rng, 5, 4);
            let sequential = SolverBuilder::new().build().solve(&inst);

            for threads in [2, 4] {
                let parallel = SolverBuilder::new().with_threads(threads).build().solve(&inst);
                assert_eq!(parallel.solutions(), sequential.solutions(), "{} threads on {}", threads, inst);
                assert_eq!(parallel.termination_reason(), &TerminationReason::SolutionFound);
            }
        }
    }

    #[test]
    fn test_parallel_three_by_three() {
        let inst = instance(vec![2, 2, 2], vec![2, 2, 2]);
        let outcome = SolverBuilder::new()
            .with_mode(SolveMode::AllSolutions)
            .with_threads(3)
            .build()
            .solve(&inst);
        assert_eq!(outcome.num_solutions(), 6);
        let distinct: FxHashSet<&Solution> = outcome.solutions().iter().collect();
        assert_eq!(distinct.len(), 6);

        let first = SolverBuilder::new().with_threads(3).build().solve(&inst);
        assert_eq!(
            first.first_solution(),
            Some(&Solution::from_bool_rows(&[
                [true, true, false],
                [true, false, true],
                [false, true, true]
            ]))
        );
    }

    #[test]
    fn test_solution_limit_sequential_and_parallel_agree() {
        let inst = instance(vec![2, 2, 2], vec![2, 2, 2]);
        let all = SolverBuilder::new()
            .with_mode(SolveMode::AllSolutions)
            .build()
            .solve(&inst);

        for threads in [1, 3] {
            let limited = SolverBuilder::new()
                .with_mode(SolveMode::AllSolutions)
                .with_solution_limit(4)
                .with_threads(threads)
                .build()
                .solve(&inst);
            assert_eq!(limited.solutions(), &all.solutions()[..4]);
            assert!(!limited.is_complete());
        }

        // In first-solution mode the run ends on acceptance, so a limit of
        // one never turns into an abort, whatever the thread count.
        let inst = instance(vec![1, 1], vec![1, 1]);
        let sequential = SolverBuilder::new()
            .with_solution_limit(1)
            .build()
            .solve(&inst);
        assert_eq!(sequential.termination_reason(), &TerminationReason::SolutionFound);
        for threads in [2, 4] {
            let parallel = SolverBuilder::new()
                .with_solution_limit(1)
                .with_threads(threads)
                .build()
                .solve(&inst);
            assert_eq!(parallel.termination_reason(), sequential.termination_reason());
            assert_eq!(parallel.solutions(), sequential.solutions());
            assert!(parallel.is_complete());
        }
    }

    #[test]
    fn test_interrupt_aborts_every_chunk() {
        let flag = AtomicBool::new(true);
        let inst = instance(vec![2, 2, 2], vec![2, 2, 2]);
        for threads in [1, 4] {
            let outcome = SolverBuilder::new()
                .with_mode(SolveMode::AllSolutions)
                .with_threads(threads)
                .with_interrupt(&flag)
                .build()
                .solve(&inst);
            assert_eq!(outcome.result(), &SolverResult::Unknown);
            assert_eq!(
                outcome.termination_reason(),
                &TerminationReason::Aborted("Interrupted".to_string())
            );
        }
    }

    #[test]
    fn test_time_limit_and_progress_log_do_not_disturb_small_runs() {
        let inst = instance(vec![1, 1], vec![1, 1]);
        let outcome = SolverBuilder::new()
            .with_mode(SolveMode::AllSolutions)
            .with_time_limit(Duration::from_secs(60))
            .with_progress_log(Duration::from_millis(1))
            .build()
            .solve(&inst);
        assert_eq!(outcome.num_solutions(), 2);
        assert!(outcome.is_complete());
    }

    #[test]
    fn test_split_roots_is_contiguous_in_exploration_order() {
        let inst = instance(vec![2, 1], vec![1, 1, 1, 0]);
        let solver = SolverBuilder::new().with_threads(4).build();
        let chunks = solver.split_roots(&inst);
        // C(4, 2) = 6 roots over 4 threads: chunks of 2, 2, 2.
        assert_eq!(chunks.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 2, 2]);

        let mut exploration = children(&PartialMatrix::empty(4), &inst);
        exploration.reverse();
        let flattened: Vec<PartialMatrix> = chunks
            .into_iter()
            .flat_map(|mut chunk| {
                chunk.reverse();
                chunk
            })
            .collect();
        assert_eq!(flattened, exploration);
    }
}
