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

//! Enumeration of row candidates.
//!
//! For a row of `width` cells that must contain exactly `ones` ones, the
//! candidates are all distinct arrangements of that multiset of bits. They
//! are produced lazily in lexicographic order (index 0 is the most
//! significant position, `0 < 1`), starting from the canonical row with the
//! ones packed into the highest indices and stepping with the classic
//! next-permutation rule until the row with the ones packed into the lowest
//! indices has been emitted.
//!
//! The order is fixed so that the search is reproducible: the engine pushes
//! children in generator order and therefore explores the last candidate
//! first.

use fixedbitset::FixedBitSet;
use std::iter::FusedIterator;
use tomograph_core::math::binomial::binomial;

/// Lazy, restartable iterator over all rows of a given width and one-count.
///
/// # Examples
///
/// ```rust
/// # use tomograph_search::candidates::RowCandidates;
///
/// let rows: Vec<Vec<usize>> = RowCandidates::new(3, 2)
///     .map(|row| row.ones().collect())
///     .collect();
/// assert_eq!(rows, vec![vec![1, 2], vec![0, 2], vec![0, 1]]);
/// ```
#[derive(Clone, Debug)]
pub struct RowCandidates {
    width: usize,
    ones: usize,
    /// The row that `next` will emit.
    current: Vec<bool>,
    exhausted: bool,
    /// Candidates not yet emitted, `None` if the count does not fit a `usize`.
    remaining: Option<usize>,
}

impl RowCandidates {
    /// Creates a generator positioned on the canonical first row.
    ///
    /// # Panics
    ///
    /// Panics if `ones > width`.
    pub fn new(width: usize, ones: usize) -> Self {
        assert!(
            ones <= width,
            "called `RowCandidates::new` with more ones than cells: ones = {}, width = {}",
            ones,
            width
        );

        let mut candidates = Self {
            width,
            ones,
            current: Vec::with_capacity(width),
            exhausted: false,
            remaining: None,
        };
        candidates.reset();
        candidates
    }

    /// Rewinds the generator to the canonical first row.
    pub fn reset(&mut self) {
        let zeros = self.width - self.ones;
        self.current.clear();
        self.current.resize(zeros, false);
        self.current.resize(self.width, true);
        self.exhausted = false;
        self.remaining = binomial::<usize>(self.width, self.ones);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn ones(&self) -> usize {
        self.ones
    }

    /// Total number of candidates, `C(width, ones)`, if it fits a `usize`.
    #[inline]
    pub fn total(&self) -> Option<usize> {
        binomial::<usize>(self.width, self.ones)
    }

    fn current_bits(&self) -> FixedBitSet {
        let mut bits = FixedBitSet::with_capacity(self.width);
        for (c, &cell) in self.current.iter().enumerate() {
            if cell {
                bits.insert(c);
            }
        }
        bits
    }
}

impl Iterator for RowCandidates {
    type Item = FixedBitSet;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let row = self.current_bits();
        self.exhausted = !next_permutation(&mut self.current);
        self.remaining = self.remaining.map(|r| r.saturating_sub(1));
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            return (0, Some(0));
        }
        match self.remaining {
            Some(r) => (r, Some(r)),
            None => (usize::MAX, None),
        }
    }
}

impl FusedIterator for RowCandidates {}

impl std::fmt::Display for RowCandidates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RowCandidates(width: {}, ones: {})", self.width, self.ones)
    }
}

/// Rearranges `bits` into the lexicographically next permutation.
///
/// Returns `false`, leaving `bits` untouched, when `bits` is already the
/// last permutation (all ones before all zeros).
fn next_permutation(bits: &mut [bool]) -> bool {
    // Rightmost `0` that is directly followed by a `1`.
    let Some(pivot) = bits.windows(2).rposition(|w| !w[0] && w[1]) else {
        return false;
    };

    // bits[pivot + 1] is set, so a rightmost one after the pivot exists.
    let successor = match bits.iter().rposition(|&b| b) {
        Some(s) => s,
        None => return false,
    };
    debug_assert!(
        successor > pivot,
        "next_permutation found successor {} not right of pivot {}",
        successor,
        pivot
    );

    bits.swap(pivot, successor);
    bits[pivot + 1..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;
    use tomograph_core::math::binomial::binomial;

    fn as_strings(candidates: RowCandidates) -> Vec<String> {
        let width = candidates.width();
        candidates
            .map(|row| {
                (0..width)
                    .map(|c| if row.contains(c) { '1' } else { '0' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_order_is_lexicographic_from_canonical_row() {
        assert_eq!(
            as_strings(RowCandidates::new(4, 2)),
            vec!["0011", "0101", "0110", "1001", "1010", "1100"]
        );
    }

    #[test]
    fn test_counts_match_binomial_and_rows_are_distinct() {
        for width in 0..=9 {
            for ones in 0..=width {
                let rows: Vec<FixedBitSet> = RowCandidates::new(width, ones).collect();
                let expected = binomial::<usize>(width, ones).unwrap();
                assert_eq!(rows.len(), expected, "C({width}, {ones})");

                let distinct: FxHashSet<FixedBitSet> = rows.iter().cloned().collect();
                assert_eq!(distinct.len(), rows.len());
                assert!(rows.iter().all(|r| r.len() == width));
                assert!(rows.iter().all(|r| r.count_ones(..) == ones));
            }
        }
    }

    #[test]
    fn test_trivial_rows_yield_single_candidate() {
        assert_eq!(as_strings(RowCandidates::new(5, 0)), vec!["00000"]);
        assert_eq!(as_strings(RowCandidates::new(5, 5)), vec!["11111"]);
        assert_eq!(as_strings(RowCandidates::new(0, 0)), vec![""]);
    }

    #[test]
    fn test_size_hint_tracks_remaining() {
        let mut it = RowCandidates::new(5, 2);
        assert_eq!(it.size_hint(), (10, Some(10)));
        it.next();
        it.next();
        assert_eq!(it.size_hint(), (8, Some(8)));
        let rest = it.by_ref().count();
        assert_eq!(rest, 8);
        assert_eq!(it.size_hint(), (0, Some(0)));
        assert!(it.next().is_none());
    }

    #[test]
    fn test_reset_restarts_sequence() {
        let mut it = RowCandidates::new(4, 1);
        let first: Vec<FixedBitSet> = it.by_ref().collect();
        assert!(it.next().is_none());

        it.reset();
        let second: Vec<FixedBitSet> = it.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = RowCandidates::new(3, 1);
        a.next();
        let b = a.clone();
        assert_eq!(a.count(), 2);
        assert_eq!(b.count(), 2);
    }

    #[test]
    fn test_next_permutation_on_last_row_is_noop() {
        let mut bits = vec![true, true, false];
        assert!(!next_permutation(&mut bits));
        assert_eq!(bits, vec![true, true, false]);
    }

    #[test]
    #[should_panic(expected = "called `RowCandidates::new` with more ones than cells")]
    fn test_new_panics_when_ones_exceed_width() {
        let _ = RowCandidates::new(2, 3);
    }
}
