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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait, the `SearchCommand` a monitor uses
//! to steer the engine, and the `PruneReason` reported when a node is
//! discarded.
//!
//! Lifecycle
//! - enter → step → {prune | expand | solution} → exit
//! - `SearchStatistics` is passed to every callback.
//!
//! Methods take `&mut self`; a monitor belongs to exactly one search. Keep
//! callbacks cheap, `on_step` and `search_command` run once per popped node.

use crate::{node::PartialMatrix, stats::SearchStatistics};
use tomograph_model::{index::ColumnIndex, instance::ProblemInstance, solution::Solution};

/// What the engine should do next.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    /// Stop the search; the message ends up in `TerminationReason::Aborted`.
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Why a node was discarded.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// A column already holds more ones than its target.
    ColumnOverflow(ColumnIndex),
    /// All rows are filled but some column is still below its target.
    ColumnDeficit,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::ColumnOverflow(column) => write!(f, "ColumnOverflow({})", column),
            PruneReason::ColumnDeficit => write!(f, "ColumnDeficit"),
        }
    }
}

/// Trait for monitoring and controlling the search process of the engine.
pub trait TreeSearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called once before the first node is popped.
    fn on_enter_search(&mut self, instance: &ProblemInstance, statistics: &SearchStatistics);
    /// Called once after the loop has stopped.
    fn on_exit_search(&mut self, statistics: &SearchStatistics);
    /// Asked before every pop.
    fn search_command(&mut self, _statistics: &SearchStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called at each iteration of the search loop.
    fn on_step(&mut self, _statistics: &SearchStatistics) {}
    /// Called when a popped node is discarded.
    fn on_prune(
        &mut self,
        _node: &PartialMatrix,
        _reason: PruneReason,
        _statistics: &SearchStatistics,
    ) {
    }
    /// Called after the children of `node` have been pushed.
    fn on_expand(&mut self, _node: &PartialMatrix, _children: usize, _statistics: &SearchStatistics) {
    }
    /// Called when a leaf is accepted.
    fn on_solution_found(&mut self, _solution: &Solution, _statistics: &SearchStatistics) {}
}

impl<M> TreeSearchMonitor for &mut M
where
    M: TreeSearchMonitor + ?Sized,
{
    #[inline(always)]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline(always)]
    fn on_enter_search(&mut self, instance: &ProblemInstance, statistics: &SearchStatistics) {
        (**self).on_enter_search(instance, statistics)
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &SearchStatistics) {
        (**self).on_exit_search(statistics)
    }

    #[inline(always)]
    fn search_command(&mut self, statistics: &SearchStatistics) -> SearchCommand {
        (**self).search_command(statistics)
    }

    #[inline(always)]
    fn on_step(&mut self, statistics: &SearchStatistics) {
        (**self).on_step(statistics)
    }

    #[inline(always)]
    fn on_prune(&mut self, node: &PartialMatrix, reason: PruneReason, statistics: &SearchStatistics) {
        (**self).on_prune(node, reason, statistics)
    }

    #[inline(always)]
    fn on_expand(&mut self, node: &PartialMatrix, children: usize, statistics: &SearchStatistics) {
        (**self).on_expand(node, children, statistics)
    }

    #[inline(always)]
    fn on_solution_found(&mut self, solution: &Solution, statistics: &SearchStatistics) {
        (**self).on_solution_found(solution, statistics)
    }
}

impl std::fmt::Debug for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}
