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

//! How many solutions a search should collect.

/// Selects between stopping at the first accepted leaf and enumerating the
/// whole solution set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SolveMode {
    #[default]
    FirstSolution,
    AllSolutions,
}

impl SolveMode {
    /// Returns `true` if the search keeps running after accepting a solution.
    #[inline]
    pub fn continues_after_solution(self) -> bool {
        self.solution_capacity().is_none()
    }

    /// Maximum number of solutions a run collects, `None` for unbounded.
    #[inline]
    pub fn solution_capacity(self) -> Option<usize> {
        match self {
            SolveMode::FirstSolution => Some(1),
            SolveMode::AllSolutions => None,
        }
    }
}

impl std::fmt::Display for SolveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveMode::FirstSolution => write!(f, "FirstSolution"),
            SolveMode::AllSolutions => write!(f, "AllSolutions"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parameters() {
        assert_eq!(SolveMode::default(), SolveMode::FirstSolution);
        assert!(!SolveMode::FirstSolution.continues_after_solution());
        assert_eq!(SolveMode::FirstSolution.solution_capacity(), Some(1));
        assert!(SolveMode::AllSolutions.continues_after_solution());
        assert_eq!(SolveMode::AllSolutions.solution_capacity(), None);
        assert_eq!(SolveMode::AllSolutions.to_string(), "AllSolutions");
    }
}
