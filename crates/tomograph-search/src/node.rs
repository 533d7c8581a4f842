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

//! Search nodes.
//!
//! A `PartialMatrix` is a prefix of a candidate solution: the first `k` rows
//! are decided, the remaining rows are open. Alongside the rows it caches the
//! per-column sums of the decided prefix, so both the pruning test and the
//! final exact test are a single pass over the columns.
//!
//! Nodes are never mutated after construction. Extending a node copies it
//! (`with_row`), which keeps sibling branches from observing each other's
//! rows at the cost of one allocation per child.

use fixedbitset::FixedBitSet;
use smallvec::SmallVec;
use tomograph_model::{index::ColumnIndex, solution::Solution};

/// Column sums of instances up to this width are stored inline.
const INLINE_COLUMNS: usize = 16;

type ColumnSums = SmallVec<[usize; INLINE_COLUMNS]>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialMatrix {
    num_columns: usize,
    rows: Vec<FixedBitSet>,
    column_sums: ColumnSums,
}

impl PartialMatrix {
    /// Creates the root node: no rows decided, every column sum zero.
    #[inline]
    pub fn empty(num_columns: usize) -> Self {
        Self {
            num_columns,
            rows: Vec::new(),
            column_sums: smallvec::smallvec![0; num_columns],
        }
    }

    /// Returns a new node with `row` appended below the decided rows.
    ///
    /// # Panics
    ///
    /// Panics if `row` does not have exactly `num_columns` bits.
    pub fn with_row(&self, row: FixedBitSet) -> Self {
        assert_eq!(
            row.len(),
            self.num_columns,
            "called `PartialMatrix::with_row` with a row of {} bits but the matrix has {} columns",
            row.len(),
            self.num_columns
        );

        let mut column_sums = self.column_sums.clone();
        for c in row.ones() {
            column_sums[c] += 1;
        }

        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.extend(self.rows.iter().cloned());
        rows.push(row);

        Self {
            num_columns: self.num_columns,
            rows,
            column_sums,
        }
    }

    /// Number of decided rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    #[inline]
    pub fn rows(&self) -> &[FixedBitSet] {
        &self.rows
    }

    /// Number of ones in the given column over the decided rows.
    ///
    /// # Panics
    ///
    /// Panics if `column` is out of bounds.
    #[inline]
    pub fn column_sum(&self, column: ColumnIndex) -> usize {
        let index = column.get();
        assert!(
            index < self.num_columns,
            "called `PartialMatrix::column_sum` with column index out of bounds: the len is {} but the index is {}",
            self.num_columns,
            index
        );
        self.column_sums[index]
    }

    #[inline]
    pub fn column_sums(&self) -> &[usize] {
        &self.column_sums
    }

    /// Returns the first column whose partial sum is already above its
    /// target, or `None` if the node can still be completed.
    ///
    /// Sums never decrease as rows are added, so an overflowing node has no
    /// valid completion.
    #[inline]
    pub fn first_overflow(&self, column_targets: &[usize]) -> Option<ColumnIndex> {
        debug_assert_eq!(
            column_targets.len(),
            self.num_columns,
            "called `PartialMatrix::first_overflow` with {} targets for {} columns",
            column_targets.len(),
            self.num_columns
        );

        self.column_sums
            .iter()
            .zip(column_targets)
            .position(|(sum, target)| sum > target)
            .map(ColumnIndex::new)
    }

    /// Returns `true` if every column sum equals its target exactly.
    #[inline]
    pub fn matches(&self, column_targets: &[usize]) -> bool {
        self.column_sums.as_slice() == column_targets
    }

    /// Converts the node into an immutable solution grid.
    #[inline]
    pub fn into_solution(self) -> Solution {
        Solution::new(self.num_columns, self.rows)
    }
}

impl std::fmt::Display for PartialMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PartialMatrix(rows: {}, columns: {}, column_sums: {:?})",
            self.rows.len(),
            self.num_columns,
            self.column_sums.as_slice()
        )
    }
}
