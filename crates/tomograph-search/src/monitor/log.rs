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

//! Progress logging through `tracing`.

use crate::{
    monitor::tree_search_monitor::TreeSearchMonitor, node::PartialMatrix,
    stats::SearchStatistics,
};
use std::time::{Duration, Instant};
use tomograph_model::{instance::ProblemInstance, solution::Solution};
use tracing::info;

/// Emits a progress line at most once per `log_interval`.
///
/// The clock is consulted only when `steps & clock_check_mask == 0`, so the
/// mask should be one less than a power of two.
#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    depth: usize,
}

impl LogTreeSearchMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            depth: 0,
        }
    }

    #[inline]
    pub fn log_interval(&self) -> Duration {
        self.log_interval
    }

    fn log_line(&mut self, stats: &SearchStatistics) {
        let now = Instant::now();
        info!(
            elapsed_secs = now.duration_since(self.start_time).as_secs_f32(),
            nodes = stats.nodes_explored,
            depth = self.depth,
            solutions = stats.solutions_found,
            pruned = stats.prunings_overflow,
            peak_stack = stats.peak_stack_len,
            "search progress"
        );
        self.last_log_time = now;
    }
}

impl Default for LogTreeSearchMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl std::fmt::Display for LogTreeSearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {:?}, clock_check_mask: {})",
            self.log_interval, self.clock_check_mask
        )
    }
}

impl TreeSearchMonitor for LogTreeSearchMonitor {
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, instance: &ProblemInstance, _statistics: &SearchStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.depth = 0;
        info!(%instance, "search started");
    }

    fn on_exit_search(&mut self, statistics: &SearchStatistics) {
        info!(
            nodes = statistics.nodes_explored,
            solutions = statistics.solutions_found,
            time = ?statistics.time_total,
            "search finished"
        );
    }

    fn on_step(&mut self, statistics: &SearchStatistics) {
        if (statistics.steps & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(statistics);
        }
    }

    fn on_expand(&mut self, node: &PartialMatrix, _children: usize, _statistics: &SearchStatistics) {
        self.depth = node.num_rows();
    }

    fn on_solution_found(&mut self, _solution: &Solution, statistics: &SearchStatistics) {
        info!(count = statistics.solutions_found, "solution found");
    }
}
