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

use std::time::Duration;

/// Counters collected during one run of the search engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Iterations of the search loop, including the final one that finds
    /// the stack empty.
    pub steps: u64,
    /// Nodes popped from the work stack.
    pub nodes_explored: u64,
    /// Children pushed onto the work stack.
    pub candidates_generated: u64,
    /// Nodes discarded because a column sum went above its target.
    pub prunings_overflow: u64,
    /// Complete matrices discarded because a column sum stayed below its target.
    pub leaf_rejections: u64,
    pub solutions_found: u64,
    /// Largest number of filled rows seen on a popped node.
    pub max_depth: u64,
    pub peak_stack_len: u64,
    pub time_total: Duration,
}

impl SearchStatistics {
    #[inline]
    pub fn on_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_candidates_generated(&mut self, count: usize) {
        self.candidates_generated = self.candidates_generated.saturating_add(count as u64);
    }

    #[inline]
    pub fn on_pruning_overflow(&mut self) {
        self.prunings_overflow = self.prunings_overflow.saturating_add(1);
    }

    #[inline]
    pub fn on_leaf_rejection(&mut self) {
        self.leaf_rejections = self.leaf_rejections.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_stack_len(&mut self, len: usize) {
        self.peak_stack_len = self.peak_stack_len.max(len as u64);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Folds the counters of another run into this one.
    ///
    /// Counters add up; depth, peak stack and time take the maximum, which is
    /// what a set of concurrent runs over disjoint subtrees reports.
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.steps = self.steps.saturating_add(other.steps);
        self.nodes_explored = self.nodes_explored.saturating_add(other.nodes_explored);
        self.candidates_generated = self
            .candidates_generated
            .saturating_add(other.candidates_generated);
        self.prunings_overflow = self.prunings_overflow.saturating_add(other.prunings_overflow);
        self.leaf_rejections = self.leaf_rejections.saturating_add(other.leaf_rejections);
        self.solutions_found = self.solutions_found.saturating_add(other.solutions_found);
        self.max_depth = self.max_depth.max(other.max_depth);
        self.peak_stack_len = self.peak_stack_len.max(other.peak_stack_len);
        self.time_total = self.time_total.max(other.time_total);
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tomograph Search Statistics:")?;
        writeln!(f, "  Steps:                 {}", self.steps)?;
        writeln!(f, "  Nodes explored:        {}", self.nodes_explored)?;
        writeln!(f, "  Candidates generated:  {}", self.candidates_generated)?;
        writeln!(f, "  Prunings (overflow):   {}", self.prunings_overflow)?;
        writeln!(f, "  Leaf rejections:       {}", self.leaf_rejections)?;
        writeln!(f, "  Solutions found:       {}", self.solutions_found)?;
        writeln!(f, "  Max depth reached:     {}", self.max_depth)?;
        writeln!(f, "  Peak stack size:       {}", self.peak_stack_len)?;
        writeln!(f, "  Total time:            {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_maxima() {
        let mut stats = SearchStatistics::default();
        stats.on_step();
        stats.on_node_explored();
        stats.on_candidates_generated(3);
        stats.on_pruning_overflow();
        stats.on_leaf_rejection();
        stats.on_solution_found();
        stats.on_depth_update(4);
        stats.on_depth_update(2);
        stats.on_stack_len(7);
        stats.on_stack_len(5);

        assert_eq!(stats.steps, 1);
        assert_eq!(stats.nodes_explored, 1);
        assert_eq!(stats.candidates_generated, 3);
        assert_eq!(stats.prunings_overflow, 1);
        assert_eq!(stats.leaf_rejections, 1);
        assert_eq!(stats.solutions_found, 1);
        assert_eq!(stats.max_depth, 4);
        assert_eq!(stats.peak_stack_len, 7);
    }

    #[test]
    fn test_merge_sums_counters_and_keeps_maxima() {
        let mut a = SearchStatistics {
            nodes_explored: 10,
            solutions_found: 1,
            max_depth: 3,
            peak_stack_len: 8,
            time_total: Duration::from_millis(5),
            ..Default::default()
        };
        let b = SearchStatistics {
            nodes_explored: 4,
            solutions_found: 2,
            max_depth: 5,
            peak_stack_len: 2,
            time_total: Duration::from_millis(9),
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.nodes_explored, 14);
        assert_eq!(a.solutions_found, 3);
        assert_eq!(a.max_depth, 5);
        assert_eq!(a.peak_stack_len, 8);
        assert_eq!(a.time_total, Duration::from_millis(9));
    }

    #[test]
    fn test_display_lists_counters() {
        let text = SearchStatistics::default().to_string();
        assert!(text.starts_with("Tomograph Search Statistics:"));
        assert!(text.contains("Solutions found:       0"));
    }
}
