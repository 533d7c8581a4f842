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

//! Depth-first reconstruction engine.
//!
//! `TomographySolver` enumerates binary matrices whose row and column sums
//! equal the targets of a `ProblemInstance`. The search keeps an explicit
//! LIFO stack of owned `PartialMatrix` nodes. Popping a node either prunes it
//! (some column is already over its target), expands it (children for the
//! next row, one per candidate row with the right number of ones) or, once
//! every row is filled, accepts it if the column sums match exactly.
//!
//! Children are pushed in the order `RowCandidates` yields them, so the last
//! candidate of a row is the first one explored. Together with the
//! lexicographic candidate order this makes every run deterministic.
//!
//! The solver owns its work stack between runs, so repeated solves reuse the
//! allocation. A search session object holds per-run state, statistics and
//! timing.

use crate::{
    candidates::RowCandidates,
    mode::SolveMode,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    node::PartialMatrix,
    result::{SolverOutcome, TerminationReason},
    stack::WorkStack,
    stats::SearchStatistics,
};
use tomograph_model::{instance::ProblemInstance, solution::Solution};
use tracing::{debug, trace};

/// The search engine. Holds reusable storage; all per-run state lives in
/// the session created by `solve`.
#[derive(Clone, Debug, Default)]
pub struct TomographySolver {
    stack: WorkStack,
}

impl TomographySolver {
    #[inline]
    pub fn new() -> Self {
        Self {
            stack: WorkStack::new(),
        }
    }

    /// Creates a solver whose work stack is already sized for `instance`.
    ///
    /// The solver sizes its stack on every run anyway; this only moves the
    /// allocation to construction time.
    #[inline]
    pub fn preallocated(instance: &ProblemInstance) -> Self {
        Self {
            stack: WorkStack::preallocated(instance),
        }
    }

    /// Searches `instance` from the empty matrix.
    pub fn solve<M>(
        &mut self,
        instance: &ProblemInstance,
        mode: SolveMode,
        monitor: M,
    ) -> SolverOutcome
    where
        M: TreeSearchMonitor,
    {
        self.solve_from(
            instance,
            std::iter::once(PartialMatrix::empty(instance.num_columns())),
            mode,
            monitor,
        )
    }

    /// Searches `instance` starting from caller-provided nodes instead of the
    /// empty matrix.
    ///
    /// Roots are pushed in iteration order, so the last root is explored
    /// first. They are checked for overflow like any other node when popped.
    ///
    /// # Panics
    ///
    /// Panics if a root does not have `instance.num_columns()` columns or
    /// has more rows than the instance.
    pub fn solve_from<M, I>(
        &mut self,
        instance: &ProblemInstance,
        roots: I,
        mode: SolveMode,
        mut monitor: M,
    ) -> SolverOutcome
    where
        M: TreeSearchMonitor,
        I: IntoIterator<Item = PartialMatrix>,
    {
        self.stack.ensure_capacity(instance);
        for root in roots {
            assert!(
                root.num_columns() == instance.num_columns()
                    && root.num_rows() <= instance.num_rows(),
                "called `TomographySolver::solve_from` with a root of shape {}x{} for a {}x{} instance",
                root.num_rows(),
                root.num_columns(),
                instance.num_rows(),
                instance.num_columns()
            );
            self.stack.push(root);
        }

        let session = SearchSession::new(self, instance, mode, &mut monitor);
        let outcome = session.run();
        self.reset();
        outcome
    }

    /// Drops leftover nodes; keeps the stack's allocation.
    #[inline]
    fn reset(&mut self) {
        self.stack.reset();
    }
}

/// Returns the children of `node` in push order: one per candidate for the
/// next row. The last child is the one the engine explores first.
///
/// Returns an empty vector if `node` already has every row.
pub fn children(node: &PartialMatrix, instance: &ProblemInstance) -> Vec<PartialMatrix> {
    let depth = node.num_rows();
    if depth >= instance.num_rows() {
        return Vec::new();
    }
    let ones = instance.row_targets()[depth];
    RowCandidates::new(instance.num_columns(), ones)
        .map(|row| node.with_row(row))
        .collect()
}

/// Per-run state of one search.
struct SearchSession<'a, M>
where
    M: TreeSearchMonitor,
{
    solver: &'a mut TomographySolver,
    instance: &'a ProblemInstance,
    mode: SolveMode,
    monitor: &'a mut M,
    solutions: Vec<Solution>,
    stats: SearchStatistics,
    start_time: std::time::Instant,
}

impl<M> std::fmt::Debug for SearchSession<'_, M>
where
    M: TreeSearchMonitor,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("instance", &self.instance)
            .field("mode", &self.mode)
            .field("monitor", &self.monitor.name())
            .field("solutions", &self.solutions.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, M> SearchSession<'a, M>
where
    M: TreeSearchMonitor,
{
    #[inline]
    fn new(
        solver: &'a mut TomographySolver,
        instance: &'a ProblemInstance,
        mode: SolveMode,
        monitor: &'a mut M,
    ) -> Self {
        Self {
            solver,
            instance,
            mode,
            monitor,
            solutions: Vec::with_capacity(mode.solution_capacity().unwrap_or(0)),
            stats: SearchStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> SolverOutcome {
        debug!(
            rows = self.instance.num_rows(),
            columns = self.instance.num_columns(),
            mode = %self.mode,
            roots = self.solver.stack.len(),
            "entering search"
        );
        self.stats.on_stack_len(self.solver.stack.len());
        self.monitor.on_enter_search(self.instance, &self.stats);

        let termination_reason = loop {
            self.stats.on_step();
            self.monitor.on_step(&self.stats);

            if let SearchCommand::Terminate(msg) = self.monitor.search_command(&self.stats) {
                break TerminationReason::Aborted(msg);
            }

            let Some(node) = self.solver.stack.pop() else {
                break TerminationReason::SearchExhausted;
            };

            if self.process(node)
                && let Some(capacity) = self.mode.solution_capacity()
                && self.solutions.len() >= capacity
            {
                break TerminationReason::SolutionFound;
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        debug!(
            termination = %termination_reason,
            solutions = self.solutions.len(),
            nodes = self.stats.nodes_explored,
            "leaving search"
        );

        self.finalize_result(termination_reason)
    }

    /// Handles one popped node. Returns `true` if it was accepted as a
    /// solution.
    #[inline(always)]
    fn process(&mut self, node: PartialMatrix) -> bool {
        self.stats.on_node_explored();
        self.stats.on_depth_update(node.num_rows() as u64);

        let instance = self.instance;
        let column_targets = instance.column_targets();

        if let Some(column) = node.first_overflow(column_targets) {
            self.stats.on_pruning_overflow();
            self.monitor
                .on_prune(&node, PruneReason::ColumnOverflow(column), &self.stats);
            return false;
        }

        if node.num_rows() < instance.num_rows() {
            self.expand(&node);
            return false;
        }

        if !node.matches(column_targets) {
            self.stats.on_leaf_rejection();
            self.monitor
                .on_prune(&node, PruneReason::ColumnDeficit, &self.stats);
            return false;
        }

        let solution = node.into_solution();
        self.stats.on_solution_found();
        trace!(index = self.solutions.len(), "accepted solution\n{}", solution);
        self.monitor.on_solution_found(&solution, &self.stats);
        self.solutions.push(solution);
        true
    }

    /// Pushes one child per candidate of the next row.
    #[inline(always)]
    fn expand(&mut self, node: &PartialMatrix) {
        let ones = self.instance.row_targets()[node.num_rows()];
        let candidates = RowCandidates::new(self.instance.num_columns(), ones);

        let count_before = self.solver.stack.len();
        self.solver
            .stack
            .extend(candidates.map(|row| node.with_row(row)));
        let count = self.solver.stack.len() - count_before;

        self.stats.on_candidates_generated(count);
        self.stats.on_stack_len(self.solver.stack.len());
        self.monitor.on_expand(node, count, &self.stats);
    }

    #[inline]
    fn finalize_result(self, reason: TerminationReason) -> SolverOutcome {
        match reason {
            TerminationReason::SolutionFound => {
                SolverOutcome::solution_found(self.solutions, self.stats)
            }
            TerminationReason::SearchExhausted | TerminationReason::InfeasibilityProven => {
                SolverOutcome::exhausted(self.solutions, self.stats)
            }
            TerminationReason::Aborted(msg) => {
                SolverOutcome::aborted(self.solutions, msg, self.stats)
            }
        }
    }
}
