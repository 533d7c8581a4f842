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

//! Cooperative cancellation.
//!
//! `InterruptMonitor` watches a shared `AtomicBool`; once any thread sets it,
//! the next `search_command` asks the engine to stop.

use crate::{
    monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    stats::SearchStatistics,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tomograph_model::instance::ProblemInstance;

#[derive(Debug, Clone, Copy)]
pub struct InterruptMonitor<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InterruptMonitor<'a> {
    #[inline]
    pub fn new(flag: &'a AtomicBool) -> Self {
        Self { flag }
    }

    #[inline]
    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl TreeSearchMonitor for InterruptMonitor<'_> {
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn on_enter_search(&mut self, _instance: &ProblemInstance, _statistics: &SearchStatistics) {}

    fn on_exit_search(&mut self, _statistics: &SearchStatistics) {}

    #[inline]
    fn search_command(&mut self, _statistics: &SearchStatistics) -> SearchCommand {
        if self.is_interrupted() {
            SearchCommand::Terminate("Interrupted".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follows_flag() {
        let flag = AtomicBool::new(false);
        let mut monitor = InterruptMonitor::new(&flag);
        let stats = SearchStatistics::default();

        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
        flag.store(true, Ordering::Relaxed);
        assert!(monitor.is_interrupted());
        assert_eq!(
            monitor.search_command(&stats),
            SearchCommand::Terminate("Interrupted".to_string())
        );
    }
}
