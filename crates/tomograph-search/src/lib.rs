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

//! Tomograph search: exhaustive reconstruction of binary matrices
//!
//! Given row and column sums, the engine in this crate enumerates every
//! binary matrix with exactly those projections (or stops at the first one).
//! It fills the matrix one row at a time, choosing each row among all rows
//! with the required number of ones, and discards a partial matrix as soon
//! as a column holds more ones than its target.
//!
//! Core flow
//! - Build a `tomograph_model::instance::ProblemInstance`.
//! - Pick a `mode::SolveMode` and a monitor (`monitor::no_op::NoOperationMonitor`
//!   if you need none).
//! - Run `engine::TomographySolver::solve` and inspect the `result::SolverOutcome`.
//!
//! Guarantees
//! - Exhaustive: in `AllSolutions` mode every matrix with the requested
//!   projections is reported exactly once.
//! - Deterministic: candidate rows come in lexicographic order and the last
//!   candidate is explored first, so repeated runs give identical lists.
//!
//! Module map
//! - `candidates`: lazy generator of rows with a fixed number of ones.
//! - `node`: partial matrices with cached column sums.
//! - `engine`: the solver and its per-run session.
//! - `monitor`: tree-search monitors (log, limits, interrupt, composite).
//! - `mode`: first solution vs. all solutions.
//! - `result`: outcomes with termination reasons.
//! - `stats`: counters and timing.

pub mod candidates;
pub mod engine;
pub mod mode;
pub mod monitor;
pub mod node;
pub mod result;
mod stack;
pub mod stats;
