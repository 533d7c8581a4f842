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

//! # Tomograph Solver
//!
//! High-level front end for the reconstruction engine. Where
//! `tomograph_search` offers the bare depth-first engine and its monitors,
//! this crate bundles the usual run configuration behind a builder: solve
//! mode, time and solution limits, external interruption, progress logging,
//! a quick rejection of instances whose totals disagree, and optional
//! parallel fan-out over the candidates of the first row.
//!
//! ## Modules
//!
//! - `solver`: `SolverBuilder` and `Solver`.
//!
//! Parallel runs return exactly what a single-threaded run returns: the
//! first row's candidates are split into contiguous chunks in exploration
//! order and the per-chunk results are concatenated in chunk order.

pub mod solver;
