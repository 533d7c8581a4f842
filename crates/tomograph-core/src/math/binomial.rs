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

//! Checked binomial coefficients.
//!
//! The number of rows of width `n` with exactly `k` ones is `C(n, k)`. The
//! search uses these counts for capacity planning and exact size hints, so
//! overflow must be reported instead of wrapping.

use num_traits::{CheckedDiv, CheckedMul, PrimInt};

/// Computes `C(n, k)` in the integer type `T`.
///
/// Returns `None` when `k > n` or when an intermediate product does not
/// fit into `T`. The multiplicative formula is evaluated on the smaller of
/// `k` and `n - k`, and every partial result is itself a binomial
/// coefficient, so the division is always exact.
///
/// # Examples
///
/// ```rust
/// # use tomograph_core::math::binomial::binomial;
///
/// assert_eq!(binomial::<u64>(5, 2), Some(10));
/// assert_eq!(binomial::<u64>(4, 0), Some(1));
/// assert_eq!(binomial::<u64>(3, 4), None);
/// assert_eq!(binomial::<u8>(40, 20), None); // overflow
/// ```
pub fn binomial<T>(n: usize, k: usize) -> Option<T>
where
    T: PrimInt + CheckedMul + CheckedDiv,
{
    if k > n {
        return None;
    }

    let k = k.min(n - k);
    let mut acc = T::one();
    for i in 0..k {
        let numerator = T::from(n - i)?;
        let denominator = T::from(i + 1)?;
        // acc * (n - i) / (i + 1) is C(n, i + 1) and therefore integral.
        acc = acc.checked_mul(&numerator)?.checked_div(&denominator)?;
    }
    Some(acc)
}

/// Computes `C(n, k)` clamped to `usize::MAX` on overflow.
///
/// Returns `0` when `k > n`.
#[inline]
pub fn binomial_saturating(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    binomial::<usize>(n, k).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values_match_pascal_triangle() {
        let mut row: Vec<u64> = vec![1];
        for n in 0..20usize {
            for (k, &expected) in row.iter().enumerate() {
                assert_eq!(binomial::<u64>(n, k), Some(expected), "C({n}, {k})");
            }
            let mut next = vec![1u64; row.len() + 1];
            for k in 1..row.len() {
                next[k] = row[k - 1] + row[k];
            }
            row = next;
        }
    }

    #[test]
    fn test_edges() {
        assert_eq!(binomial::<u32>(0, 0), Some(1));
        assert_eq!(binomial::<u32>(7, 7), Some(1));
        assert_eq!(binomial::<u32>(7, 1), Some(7));
        assert_eq!(binomial::<u32>(7, 8), None);
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(binomial::<u8>(16, 8), None); // 12870
        assert_eq!(binomial::<u32>(16, 8), Some(12_870));
        assert!(binomial::<u64>(200, 100).is_none());
    }

    #[test]
    fn test_saturating_variant() {
        assert_eq!(binomial_saturating(6, 3), 20);
        assert_eq!(binomial_saturating(3, 6), 0);
        assert_eq!(binomial_saturating(400, 200), usize::MAX);
    }
}
