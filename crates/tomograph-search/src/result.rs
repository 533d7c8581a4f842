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

//! Search outcomes.
//!
//! A run ends with a `SolverResult` (what is known about the instance), a
//! `TerminationReason` (why the loop stopped) and the `SearchStatistics` it
//! gathered. An unsatisfiable instance is a regular result, not an error.

use crate::stats::SearchStatistics;
use tomograph_model::solution::Solution;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult {
    /// The search space was exhausted (or the totals disagree) and no
    /// matrix matches the projections.
    Unsatisfiable,
    /// At least one solution was found, in discovery order.
    Satisfiable(Vec<Solution>),
    /// The search was aborted before it found a solution or proved there
    /// is none.
    Unknown,
}

impl std::fmt::Display for SolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Unsatisfiable => write!(f, "Unsatisfiable"),
            SolverResult::Satisfiable(solutions) => {
                write!(f, "Satisfiable(solutions={})", solutions.len())
            }
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// `SolveMode::FirstSolution` accepted its solution.
    SolutionFound,
    /// The work stack ran empty.
    SearchExhausted,
    /// The instance was rejected before the search started.
    InfeasibilityProven,
    /// A monitor asked the engine to stop. The string says why.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::SolutionFound => write!(f, "Solution Found"),
            TerminationReason::SearchExhausted => write!(f, "Search Exhausted"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result of the engine after termination.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    result: SolverResult,
    termination_reason: TerminationReason,
    statistics: SearchStatistics,
}

impl SolverOutcome {
    #[inline]
    pub fn new(
        result: SolverResult,
        termination_reason: TerminationReason,
        statistics: SearchStatistics,
    ) -> Self {
        Self {
            result,
            termination_reason,
            statistics,
        }
    }

    /// The first-solution run stopped on an accepted leaf.
    #[inline]
    pub fn solution_found(solutions: Vec<Solution>, statistics: SearchStatistics) -> Self {
        assert!(
            !solutions.is_empty(),
            "called `SolverOutcome::solution_found` without a solution"
        );
        Self::new(
            SolverResult::Satisfiable(solutions),
            TerminationReason::SolutionFound,
            statistics,
        )
    }

    /// The whole space was searched; an empty list proves unsatisfiability.
    #[inline]
    pub fn exhausted(solutions: Vec<Solution>, statistics: SearchStatistics) -> Self {
        let result = if solutions.is_empty() {
            SolverResult::Unsatisfiable
        } else {
            SolverResult::Satisfiable(solutions)
        };
        Self::new(result, TerminationReason::SearchExhausted, statistics)
    }

    #[inline]
    pub fn infeasible(statistics: SearchStatistics) -> Self {
        Self::new(
            SolverResult::Unsatisfiable,
            TerminationReason::InfeasibilityProven,
            statistics,
        )
    }

    /// The run was stopped early; solutions found so far are kept.
    #[inline]
    pub fn aborted<R>(solutions: Vec<Solution>, reason: R, statistics: SearchStatistics) -> Self
    where
        R: Into<String>,
    {
        let result = if solutions.is_empty() {
            SolverResult::Unknown
        } else {
            SolverResult::Satisfiable(solutions)
        };
        Self::new(result, TerminationReason::Aborted(reason.into()), statistics)
    }

    #[inline]
    pub fn result(&self) -> &SolverResult {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Solutions in discovery order; empty unless the result is satisfiable.
    #[inline]
    pub fn solutions(&self) -> &[Solution] {
        match &self.result {
            SolverResult::Satisfiable(solutions) => solutions,
            _ => &[],
        }
    }

    #[inline]
    pub fn first_solution(&self) -> Option<&Solution> {
        self.solutions().first()
    }

    #[inline]
    pub fn num_solutions(&self) -> usize {
        self.solutions().len()
    }

    #[inline]
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self.result, SolverResult::Unsatisfiable)
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        matches!(self.result, SolverResult::Satisfiable(_))
    }

    /// Returns `true` unless a monitor cut the search short.
    #[inline]
    pub fn is_complete(&self) -> bool {
        !matches!(self.termination_reason, TerminationReason::Aborted(_))
    }

    #[inline]
    pub fn into_solutions(self) -> Vec<Solution> {
        match self.result {
            SolverResult::Satisfiable(solutions) => solutions,
            _ => Vec::new(),
        }
    }

    #[inline]
    pub fn into_parts(self) -> (SolverResult, TerminationReason, SearchStatistics) {
        (self.result, self.termination_reason, self.statistics)
    }
}

impl std::fmt::Display for SolverOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolverOutcome(result: {}, termination: {}, nodes: {})",
            self.result, self.termination_reason, self.statistics.nodes_explored
        )
    }
}
