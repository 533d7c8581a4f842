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

use crate::node::PartialMatrix;
use tomograph_core::math::binomial::binomial_saturating;
use tomograph_model::instance::ProblemInstance;

/// Upper bound on the capacity reserved up front. Deeper stacks still grow
/// on demand.
const MAX_PREALLOCATED_NODES: usize = 1 << 14;

/// The LIFO stack of pending search nodes.
///
/// Nodes are owned by the stack until popped.
///
/// A depth-first run never holds more than the sum of the branching factors
/// along one root-to-leaf path, which is `Σ C(C, r_i)` over the row targets.
/// `preallocated` reserves that much, capped at a fixed ceiling.
#[derive(Clone, Debug, Default)]
pub struct WorkStack {
    entries: Vec<PartialMatrix>,
}

impl WorkStack {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a stack with room for the deepest frontier of `instance`.
    #[inline]
    pub fn preallocated(instance: &ProblemInstance) -> Self {
        Self {
            entries: Vec::with_capacity(Self::capacity_hint(instance)),
        }
    }

    /// Ensures the stack has capacity for the given instance.
    #[inline]
    pub fn ensure_capacity(&mut self, instance: &ProblemInstance) {
        let wanted = Self::capacity_hint(instance);
        if self.entries.capacity() < wanted {
            self.entries.reserve(wanted - self.entries.len());
        }
    }

    fn capacity_hint(instance: &ProblemInstance) -> usize {
        let width = instance.num_columns();
        instance
            .row_targets()
            .iter()
            .fold(1usize, |acc, &ones| {
                acc.saturating_add(binomial_saturating(width, ones))
            })
            .min(MAX_PREALLOCATED_NODES)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn push(&mut self, node: PartialMatrix) {
        self.entries.push(node);
    }

    /// Pushes the nodes in iteration order; the last one is popped first.
    #[inline]
    pub fn extend<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = PartialMatrix>,
    {
        self.entries.extend(nodes);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<PartialMatrix> {
        self.entries.pop()
    }

    /// Drops all pending nodes, but keeps allocated capacity.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Display for WorkStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorkStack(len: {}, capacity: {})",
            self.entries.len(),
            self.entries.capacity()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(rows: Vec<usize>, columns: Vec<usize>) -> ProblemInstance {
        ProblemInstance::new(rows, columns).expect("valid instance")
    }

    #[test]
    fn test_new_is_empty() {
        let s = WorkStack::new();
        assert_eq!(s.len(), 0);
        assert_eq!(
            s.to_string(),
            format!("WorkStack(len: 0, capacity: {})", s.entries.capacity())
        );
    }

    #[test]
    fn test_preallocated_uses_binomial_frontier() {
        // 1 + C(4,2) + C(4,1) = 11
        let s = WorkStack::preallocated(&instance(vec![2, 1], vec![1, 1, 1, 0]));
        assert!(s.entries.capacity() >= 11);

        // Huge frontiers are capped.
        let wide = instance(vec![32; 8], vec![8; 64]);
        let s = WorkStack::preallocated(&wide);
        assert!(s.entries.capacity() >= MAX_PREALLOCATED_NODES);
        assert!(s.entries.capacity() < MAX_PREALLOCATED_NODES * 2);
    }

    #[test]
    fn test_ensure_capacity_grows_but_never_shrinks() {
        let mut s = WorkStack::new();
        s.ensure_capacity(&instance(vec![2, 2], vec![1, 1, 1, 1]));
        let grown = s.entries.capacity();
        // 1 + 6 + 6
        assert!(grown >= 13);
        s.ensure_capacity(&instance(vec![0], vec![0]));
        assert_eq!(s.entries.capacity(), grown);
    }

    #[test]
    fn test_lifo_order_and_reset() {
        let root = PartialMatrix::empty(2);
        let mut s = WorkStack::new();
        s.push(root.clone());
        s.extend([PartialMatrix::empty(3), PartialMatrix::empty(4)]);
        assert_eq!(s.len(), 3);

        assert_eq!(s.pop().map(|n| n.num_columns()), Some(4));
        assert_eq!(s.pop().map(|n| n.num_columns()), Some(3));
        assert_eq!(s.pop(), Some(root));
        assert_eq!(s.pop(), None);

        s.push(PartialMatrix::empty(1));
        s.reset();
        assert_eq!(s.len(), 0);
        assert_eq!(s.pop(), None);
    }
}
