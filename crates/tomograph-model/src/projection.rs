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

//! Projections of grayscale images.
//!
//! Binary tomography is usually fed by an imaging pipeline: a grayscale
//! buffer is thresholded into a binary image whose row and column sums are
//! the measured projections. `Projection` performs the thresholding step
//! with the same rule as the binary conversion of the surrounding tools
//! (a pixel strictly below the threshold is background, anything else is
//! foreground) and hands out the resulting targets as a `ProblemInstance`.

use crate::{
    index::{ColumnIndex, RowIndex},
    instance::ProblemInstance,
};
use fixedbitset::FixedBitSet;
use thiserror::Error;

/// Threshold used by the binary conversion of the imaging tools.
pub const DEFAULT_THRESHOLD: u8 = 127;

/// The error type for building a projection from a pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The buffer is not made of whole rows.
    #[error("buffer of {len} pixels is not a multiple of the row width {width}")]
    BufferSize { len: usize, width: usize },
    /// A zero width was given for a non-empty buffer.
    #[error("row width must be positive for a non-empty buffer")]
    ZeroWidth,
}

/// A thresholded binary image together with its row and column sums.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    width: usize,
    rows: Vec<FixedBitSet>,
}

impl Projection {
    /// Thresholds a row-major 8-bit grayscale buffer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tomograph_model::projection::{Projection, DEFAULT_THRESHOLD};
    ///
    /// let pixels = [0u8, 255, 200, 10];
    /// let projection = Projection::from_luma(&pixels, 2, DEFAULT_THRESHOLD).unwrap();
    /// let instance = projection.into_instance();
    /// assert_eq!(instance.row_targets(), &[1, 1]);
    /// assert_eq!(instance.column_targets(), &[1, 1]);
    /// ```
    pub fn from_luma(pixels: &[u8], width: usize, threshold: u8) -> Result<Self, ProjectionError> {
        if width == 0 {
            return if pixels.is_empty() {
                Ok(Self {
                    width: 0,
                    rows: Vec::new(),
                })
            } else {
                Err(ProjectionError::ZeroWidth)
            };
        }

        if pixels.len() % width != 0 {
            return Err(ProjectionError::BufferSize {
                len: pixels.len(),
                width,
            });
        }

        let rows = pixels
            .chunks_exact(width)
            .map(|line| {
                let mut bits = FixedBitSet::with_capacity(width);
                for (c, &value) in line.iter().enumerate() {
                    bits.set(c, value >= threshold);
                }
                bits
            })
            .collect();

        Ok(Self { width, rows })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the pixel at (`row`, `column`) is foreground.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn is_set(&self, row: RowIndex, column: ColumnIndex) -> bool {
        assert!(
            row.get() < self.height() && column.get() < self.width,
            "called `Projection::is_set` with index out of bounds: the size is {}x{} but the index is ({}, {})",
            self.height(),
            self.width,
            row.get(),
            column.get()
        );
        self.rows[row.get()].contains(column.get())
    }

    #[inline]
    pub fn rows(&self) -> &[FixedBitSet] {
        &self.rows
    }

    pub fn row_sums(&self) -> Vec<usize> {
        self.rows.iter().map(|row| row.count_ones(..)).collect()
    }

    pub fn column_sums(&self) -> Vec<usize> {
        let mut sums = vec![0usize; self.width];
        for row in &self.rows {
            for c in row.ones() {
                sums[c] += 1;
            }
        }
        sums
    }

    /// Turns the projection into a tomography instance.
    ///
    /// Infallible: sums counted from a real image never exceed the opposite
    /// dimension.
    pub fn into_instance(self) -> ProblemInstance {
        ProblemInstance::from_derived_targets(self.row_sums(), self.column_sums())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_rule_is_inclusive() {
        let pixels = [126u8, 127, 128];
        let p = Projection::from_luma(&pixels, 3, 127).unwrap();
        assert!(!p.is_set(RowIndex::new(0), ColumnIndex::new(0)));
        assert!(p.is_set(RowIndex::new(0), ColumnIndex::new(1)));
        assert!(p.is_set(RowIndex::new(0), ColumnIndex::new(2)));
    }

    #[test]
    fn test_sums_and_instance() {
        #[rustfmt::skip]
        let pixels = [
            255u8, 0,   255,
            0,     0,   255,
        ];
        let p = Projection::from_luma(&pixels, 3, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(p.width(), 3);
        assert_eq!(p.height(), 2);
        assert_eq!(p.row_sums(), vec![2, 1]);
        assert_eq!(p.column_sums(), vec![1, 0, 2]);

        let inst = p.into_instance();
        assert_eq!(inst.row_targets(), &[2, 1]);
        assert_eq!(inst.column_targets(), &[1, 0, 2]);
    }

    #[test]
    fn test_buffer_must_hold_whole_rows() {
        let err = Projection::from_luma(&[0u8; 5], 2, 10).unwrap_err();
        assert_eq!(err, ProjectionError::BufferSize { len: 5, width: 2 });
    }

    #[test]
    fn test_zero_width() {
        assert_eq!(
            Projection::from_luma(&[1u8], 0, 10).unwrap_err(),
            ProjectionError::ZeroWidth
        );
        let empty = Projection::from_luma(&[], 0, 10).unwrap();
        assert_eq!(empty.height(), 0);
        assert!(empty.into_instance().is_empty());
    }
}
