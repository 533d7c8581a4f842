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

//! Validated row and column targets.
//!
//! A `ProblemInstance` is the only input of the reconstruction search. It is
//! immutable once constructed and guarantees that no row asks for more ones
//! than there are columns and no column asks for more ones than there are
//! rows. Instances violating this cannot have a solution, and they are
//! rejected at construction so that callers can tell a malformed instance
//! apart from a well-formed one that merely has no solution.
//!
//! The equality of the two target totals is a further necessary condition
//! for solvability. It is exposed through `has_consistent_totals` but not
//! enforced, since an instance with unequal totals is well-formed and simply
//! unsatisfiable.

use crate::index::{ColumnIndex, RowIndex};
use thiserror::Error;

/// The error type for instance validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    /// A row target is larger than the number of columns.
    #[error("{row} requires {target} ones but the instance has only {width} columns")]
    RowTargetExceedsWidth {
        row: RowIndex,
        target: usize,
        width: usize,
    },
    /// A column target is larger than the number of rows.
    #[error("{column} requires {target} ones but the instance has only {height} rows")]
    ColumnTargetExceedsHeight {
        column: ColumnIndex,
        target: usize,
        height: usize,
    },
    /// A grid used to derive targets does not have rows of equal length.
    #[error("{row} has {len} cells but the first row has {expected}")]
    RaggedRows {
        row: RowIndex,
        len: usize,
        expected: usize,
    },
}

/// Row and column targets of a binary tomography problem.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProblemInstance {
    row_targets: Vec<usize>,
    column_targets: Vec<usize>,
}

impl ProblemInstance {
    /// Creates a new instance, validating every target against the
    /// opposite dimension.
    ///
    /// Rows are checked before columns and the first violation is reported.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tomograph_model::instance::{InstanceError, ProblemInstance};
    ///
    /// let instance = ProblemInstance::new(vec![1, 1], vec![1, 1]).unwrap();
    /// assert_eq!(instance.num_rows(), 2);
    ///
    /// let err = ProblemInstance::new(vec![5], vec![1, 1]).unwrap_err();
    /// assert!(matches!(err, InstanceError::RowTargetExceedsWidth { target: 5, width: 2, .. }));
    /// ```
    pub fn new(row_targets: Vec<usize>, column_targets: Vec<usize>) -> Result<Self, InstanceError> {
        let width = column_targets.len();
        let height = row_targets.len();

        if let Some((row, &target)) = row_targets.iter().enumerate().find(|(_, t)| **t > width) {
            return Err(InstanceError::RowTargetExceedsWidth {
                row: RowIndex::new(row),
                target,
                width,
            });
        }

        if let Some((column, &target)) = column_targets
            .iter()
            .enumerate()
            .find(|(_, t)| **t > height)
        {
            return Err(InstanceError::ColumnTargetExceedsHeight {
                column: ColumnIndex::new(column),
                target,
                height,
            });
        }

        Ok(Self {
            row_targets,
            column_targets,
        })
    }

    /// Derives the targets of an existing grid.
    ///
    /// The resulting instance is always valid and always has the grid among
    /// its solutions. Fails only when the rows have different lengths.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, InstanceError>
    where
        R: AsRef<[bool]>,
    {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut column_targets = vec![0usize; width];
        let mut row_targets = Vec::with_capacity(rows.len());

        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != width {
                return Err(InstanceError::RaggedRows {
                    row: RowIndex::new(row),
                    len: cells.len(),
                    expected: width,
                });
            }

            let mut ones = 0;
            for (column, &cell) in cells.iter().enumerate() {
                if cell {
                    ones += 1;
                    column_targets[column] += 1;
                }
            }
            row_targets.push(ones);
        }

        Ok(Self::from_derived_targets(row_targets, column_targets))
    }

    /// Wraps targets that were counted from an actual grid.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the targets violate the dimension bounds.
    #[inline]
    pub(crate) fn from_derived_targets(row_targets: Vec<usize>, column_targets: Vec<usize>) -> Self {
        debug_assert!(
            row_targets.iter().all(|&t| t <= column_targets.len()),
            "called `ProblemInstance::from_derived_targets` with a row target exceeding the width"
        );
        debug_assert!(
            column_targets.iter().all(|&t| t <= row_targets.len()),
            "called `ProblemInstance::from_derived_targets` with a column target exceeding the height"
        );

        Self {
            row_targets,
            column_targets,
        }
    }

    /// Returns the number of rows (R).
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.row_targets.len()
    }

    /// Returns the number of columns (C).
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.column_targets.len()
    }

    /// Returns the number of ones required in the given row.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[inline]
    pub fn row_target(&self, row: RowIndex) -> usize {
        let index = row.get();
        assert!(
            index < self.num_rows(),
            "called `ProblemInstance::row_target` with row index out of bounds: the len is {} but the index is {}",
            self.num_rows(),
            index
        );
        self.row_targets[index]
    }

    /// Returns the number of ones required in the given column.
    ///
    /// # Panics
    ///
    /// Panics if `column` is out of bounds.
    #[inline]
    pub fn column_target(&self, column: ColumnIndex) -> usize {
        let index = column.get();
        assert!(
            index < self.num_columns(),
            "called `ProblemInstance::column_target` with column index out of bounds: the len is {} but the index is {}",
            self.num_columns(),
            index
        );
        self.column_targets[index]
    }

    #[inline]
    pub fn row_targets(&self) -> &[usize] {
        &self.row_targets
    }

    #[inline]
    pub fn column_targets(&self) -> &[usize] {
        &self.column_targets
    }

    /// Total number of ones demanded by the row targets.
    #[inline]
    pub fn total_row_ones(&self) -> usize {
        self.row_targets.iter().sum()
    }

    /// Total number of ones demanded by the column targets.
    #[inline]
    pub fn total_column_ones(&self) -> usize {
        self.column_targets.iter().sum()
    }

    /// Returns `true` if both target totals agree.
    ///
    /// Every one-bit is counted once by its row and once by its column, so
    /// an instance with differing totals has no solution.
    #[inline]
    pub fn has_consistent_totals(&self) -> bool {
        self.total_row_ones() == self.total_column_ones()
    }

    /// Returns `true` if the instance has no rows or no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_targets.is_empty() || self.column_targets.is_empty()
    }
}

impl std::fmt::Display for ProblemInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ProblemInstance({}x{}, rows: {:?}, columns: {:?})",
            self.num_rows(),
            self.num_columns(),
            self.row_targets,
            self.column_targets
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_instance_accessors() {
        let inst = ProblemInstance::new(vec![2, 0, 1], vec![1, 1, 1]).unwrap();
        assert_eq!(inst.num_rows(), 3);
        assert_eq!(inst.num_columns(), 3);
        assert_eq!(inst.row_target(RowIndex::new(0)), 2);
        assert_eq!(inst.column_target(ColumnIndex::new(2)), 1);
        assert_eq!(inst.row_targets(), &[2, 0, 1]);
        assert_eq!(inst.column_targets(), &[1, 1, 1]);
        assert_eq!(inst.total_row_ones(), 3);
        assert_eq!(inst.total_column_ones(), 3);
        assert!(inst.has_consistent_totals());
        assert!(!inst.is_empty());
    }

    #[test]
    fn test_row_target_exceeding_width_is_rejected() {
        let err = ProblemInstance::new(vec![5], vec![1, 1]).unwrap_err();
        assert_eq!(
            err,
            InstanceError::RowTargetExceedsWidth {
                row: RowIndex::new(0),
                target: 5,
                width: 2,
            }
        );
        assert!(err.to_string().contains("requires 5 ones"));
    }

    #[test]
    fn test_column_target_exceeding_height_is_rejected() {
        let err = ProblemInstance::new(vec![1, 1], vec![0, 3]).unwrap_err();
        assert_eq!(
            err,
            InstanceError::ColumnTargetExceedsHeight {
                column: ColumnIndex::new(1),
                target: 3,
                height: 2,
            }
        );
    }

    #[test]
    fn test_rows_are_checked_before_columns() {
        let err = ProblemInstance::new(vec![4], vec![2, 2]).unwrap_err();
        assert!(matches!(err, InstanceError::RowTargetExceedsWidth { .. }));
    }

    #[test]
    fn test_infeasible_but_valid_instance_is_accepted() {
        let inst = ProblemInstance::new(vec![0], vec![1]).unwrap();
        assert!(!inst.has_consistent_totals());
    }

    #[test]
    fn test_empty_dimensions() {
        let inst = ProblemInstance::new(vec![], vec![]).unwrap();
        assert!(inst.is_empty());
        assert!(inst.has_consistent_totals());

        // No columns: every row target must be zero.
        assert!(ProblemInstance::new(vec![0, 0], vec![]).is_ok());
        assert!(ProblemInstance::new(vec![1], vec![]).is_err());
    }

    #[test]
    fn test_from_rows_counts_targets() {
        let grid = [[true, false, true], [false, false, true]];
        let inst = ProblemInstance::from_rows(&grid).unwrap();
        assert_eq!(inst.row_targets(), &[2, 1]);
        assert_eq!(inst.column_targets(), &[1, 0, 2]);
    }

    #[test]
    fn test_from_rows_rejects_ragged_grid() {
        let grid: Vec<Vec<bool>> = vec![vec![true, false], vec![true]];
        let err = ProblemInstance::from_rows(&grid).unwrap_err();
        assert_eq!(
            err,
            InstanceError::RaggedRows {
                row: RowIndex::new(1),
                len: 1,
                expected: 2,
            }
        );
    }

    #[test]
    #[should_panic(expected = "called `ProblemInstance::row_target` with row index out of bounds")]
    fn test_row_target_out_of_bounds_panics() {
        let inst = ProblemInstance::new(vec![1], vec![1]).unwrap();
        let _ = inst.row_target(RowIndex::new(1));
    }

    #[test]
    fn test_display() {
        let inst = ProblemInstance::new(vec![1, 1], vec![1, 1]).unwrap();
        assert_eq!(
            inst.to_string(),
            "ProblemInstance(2x2, rows: [1, 1], columns: [1, 1])"
        );
    }
}
