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

use crate::{
    monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    stats::SearchStatistics,
};
use std::time::{Duration, Instant};
use tomograph_model::instance::ProblemInstance;

/// A monitor that terminates the search after a specified duration.
///
/// Checks the clock only every `check_interval` steps to keep the hot loop free
/// of syscalls.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start_time: Option<Instant>,
    check_interval: u64,
    steps_since_last_check: u64,
}

impl TimeLimitMonitor {
    /// Creates a new `TimeLimitMonitor`. A `check_interval` of zero is
    /// treated as one.
    pub fn new(time_limit: Duration, check_interval: u64) -> Self {
        Self {
            time_limit,
            start_time: None,
            check_interval: check_interval.max(1),
            steps_since_last_check: 0,
        }
    }

    /// Creates a new `TimeLimitMonitor` that looks at the clock every 1024 steps.
    pub fn with_default_check_interval(time_limit: Duration) -> Self {
        Self::new(time_limit, 1024)
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl TreeSearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _instance: &ProblemInstance, _statistics: &SearchStatistics) {
        self.start_time = Some(Instant::now());
        self.steps_since_last_check = 0;
    }

    fn on_exit_search(&mut self, _statistics: &SearchStatistics) {
        self.start_time = None;
    }

    fn search_command(&mut self, _statistics: &SearchStatistics) -> SearchCommand {
        self.steps_since_last_check = self.steps_since_last_check.saturating_add(1);

        if self.steps_since_last_check >= self.check_interval {
            self.steps_since_last_check = 0;

            if let Some(start) = self.start_time
                && start.elapsed() >= self.time_limit
            {
                return SearchCommand::Terminate(format!(
                    "Time limit of {:.3} seconds exceeded",
                    self.time_limit.as_secs_f64()
                ));
            }
        }

        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> ProblemInstance {
        ProblemInstance::new(vec![1], vec![1]).expect("valid instance")
    }

    #[test]
    fn test_zero_limit_terminates_on_first_check() {
        let stats = SearchStatistics::default();
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO, 1);
        monitor.on_enter_search(&instance(), &stats);
        assert!(matches!(
            monitor.search_command(&stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_clock_is_only_read_every_interval() {
        let stats = SearchStatistics::default();
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO, 3);
        monitor.on_enter_search(&instance(), &stats);
        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
        assert!(matches!(
            monitor.search_command(&stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_generous_limit_continues_and_idle_monitor_never_fires() {
        let stats = SearchStatistics::default();
        let mut idle = TimeLimitMonitor::new(Duration::ZERO, 1);
        // Not entered: no start time, nothing to compare against.
        assert_eq!(idle.search_command(&stats), SearchCommand::Continue);

        let mut monitor = TimeLimitMonitor::new(Duration::from_secs(3600), 1);
        monitor.on_enter_search(&instance(), &stats);
        for _ in 0..10 {
            assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
        }
        monitor.on_exit_search(&stats);
        assert_eq!(monitor.time_limit(), Duration::from_secs(3600));
    }
}
