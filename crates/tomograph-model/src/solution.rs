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
    index::{ColumnIndex, RowIndex},
    instance::ProblemInstance,
};
use fixedbitset::FixedBitSet;

/// A reconstructed R×C binary grid.
///
/// Rows are stored in the order they were assigned by the search (row 0
/// first), each as a `FixedBitSet` of length C. A solution is an immutable
/// snapshot; equality, hashing and ordering are bitwise, which makes it
/// cheap to check that a set of solutions holds no duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Solution {
    /// The number of columns. Kept explicitly so that a grid without rows
    /// still knows its width.
    num_columns: usize,
    /// `rows[r]` holds the cells of row `r`.
    rows: Vec<FixedBitSet>,
}

impl Solution {
    /// Constructs a new `Solution` from its rows.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have exactly `num_columns` bits.
    pub fn new(num_columns: usize, rows: Vec<FixedBitSet>) -> Self {
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != num_columns) {
            panic!(
                "called `Solution::new` with inconsistent row length: row {} has {} bits but num_columns = {}",
                r,
                row.len(),
                num_columns
            );
        }

        Self { num_columns, rows }
    }

    /// Builds a solution from boolean rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    pub fn from_bool_rows<R>(rows: &[R]) -> Self
    where
        R: AsRef<[bool]>,
    {
        let num_columns = rows.first().map_or(0, |r| r.as_ref().len());
        let rows = rows
            .iter()
            .map(|cells| {
                let cells = cells.as_ref();
                let mut bits = FixedBitSet::with_capacity(cells.len());
                for (c, &cell) in cells.iter().enumerate() {
                    bits.set(c, cell);
                }
                bits
            })
            .collect();
        Self::new(num_columns, rows)
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    /// Returns the cell at (`row`, `column`).
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, row: RowIndex, column: ColumnIndex) -> bool {
        assert!(
            column.get() < self.num_columns,
            "called `Solution::get` with column index out of bounds: the len is {} but the index is {}",
            self.num_columns,
            column.get()
        );
        self.row(row).contains(column.get())
    }

    /// Returns the bits of a single row.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[inline]
    pub fn row(&self, row: RowIndex) -> &FixedBitSet {
        let index = row.get();
        assert!(
            index < self.num_rows(),
            "called `Solution::row` with row index out of bounds: the len is {} but the index is {}",
            self.num_rows(),
            index
        );
        &self.rows[index]
    }

    #[inline]
    pub fn rows(&self) -> &[FixedBitSet] {
        &self.rows
    }

    /// Number of ones in every row.
    pub fn row_sums(&self) -> Vec<usize> {
        self.rows.iter().map(|row| row.count_ones(..)).collect()
    }

    /// Number of ones in every column.
    pub fn column_sums(&self) -> Vec<usize> {
        let mut sums = vec![0usize; self.num_columns];
        for row in &self.rows {
            for c in row.ones() {
                sums[c] += 1;
            }
        }
        sums
    }

    /// Returns the grid as nested boolean vectors, row 0 first.
    pub fn to_bool_rows(&self) -> Vec<Vec<bool>> {
        self.rows
            .iter()
            .map(|row| (0..self.num_columns).map(|c| row.contains(c)).collect())
            .collect()
    }

    /// Returns `true` if the grid has the instance's dimensions and meets
    /// every row and column target exactly.
    pub fn satisfies(&self, instance: &ProblemInstance) -> bool {
        self.num_rows() == instance.num_rows()
            && self.num_columns == instance.num_columns()
            && self.row_sums() == instance.row_targets()
            && self.column_sums() == instance.column_targets()
    }

    /// Returns the instance whose targets are this grid's projections.
    pub fn projections(&self) -> ProblemInstance {
        ProblemInstance::from_derived_targets(self.row_sums(), self.column_sums())
    }
}

impl std::fmt::Display for Solution {
    /// One line per row, cells written as `1` or `0`, each followed by a
    /// single space.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            for c in 0..self.num_columns {
                write!(f, "{} ", if row.contains(c) { '1' } else { '0' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ri(i: usize) -> RowIndex {
        RowIndex::new(i)
    }

    fn ci(i: usize) -> ColumnIndex {
        ColumnIndex::new(i)
    }

    fn identity() -> Solution {
        Solution::from_bool_rows(&[[true, false], [false, true]])
    }

    #[test]
    fn test_accessors() {
        let sol = identity();
        assert_eq!(sol.num_rows(), 2);
        assert_eq!(sol.num_columns(), 2);
        assert!(sol.get(ri(0), ci(0)));
        assert!(!sol.get(ri(0), ci(1)));
        assert!(sol.get(ri(1), ci(1)));
        assert_eq!(sol.row(ri(1)).ones().collect::<Vec<_>>(), vec![1]);
        assert_eq!(sol.rows().len(), 2);
    }

    #[test]
    fn test_sums_and_satisfies() {
        let sol = Solution::from_bool_rows(&[[true, true, false], [false, true, false]]);
        assert_eq!(sol.row_sums(), vec![2, 1]);
        assert_eq!(sol.column_sums(), vec![1, 2, 0]);

        let ok = ProblemInstance::new(vec![2, 1], vec![1, 2, 0]).unwrap();
        assert!(sol.satisfies(&ok));

        let wrong_columns = ProblemInstance::new(vec![2, 1], vec![2, 1, 0]).unwrap();
        assert!(!sol.satisfies(&wrong_columns));

        let wrong_shape = ProblemInstance::new(vec![2], vec![1, 1, 0]).unwrap();
        assert!(!sol.satisfies(&wrong_shape));
    }

    #[test]
    fn test_projections_round_trip() {
        let sol = Solution::from_bool_rows(&[[false, true, true], [true, false, false]]);
        let inst = sol.projections();
        assert_eq!(inst.row_targets(), &[2, 1]);
        assert_eq!(inst.column_targets(), &[1, 1, 1]);
        assert!(sol.satisfies(&inst));
    }

    #[test]
    fn test_to_bool_rows() {
        let rows = vec![vec![true, false, true], vec![false, false, false]];
        let sol = Solution::from_bool_rows(&rows);
        assert_eq!(sol.to_bool_rows(), rows);
    }

    #[test]
    fn test_display_renders_grid() {
        assert_eq!(identity().to_string(), "1 0 \n0 1 \n");
    }

    #[test]
    fn test_empty_grid() {
        let sol = Solution::new(3, Vec::new());
        assert_eq!(sol.num_rows(), 0);
        assert_eq!(sol.num_columns(), 3);
        assert_eq!(sol.column_sums(), vec![0, 0, 0]);
        assert_eq!(sol.to_string(), "");
    }

    #[test]
    fn test_equality_is_bitwise() {
        let anti = Solution::from_bool_rows(&[[false, true], [true, false]]);
        assert_ne!(identity(), anti);
        assert_eq!(identity(), identity().clone());
    }

    #[test]
    #[should_panic(expected = "called `Solution::new` with inconsistent row length")]
    fn test_new_panics_on_row_length_mismatch() {
        let _ = Solution::new(2, vec![FixedBitSet::with_capacity(3)]);
    }
}
