use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::iter::FusedIterator;

use crate::node::{Link, NodeArena};


/// An iterator over the entries of a [`SkipIndex`], in ascending key order.
///
/// Created by [`SkipIndex::iter`].
///
/// [`SkipIndex`]: crate::SkipIndex
/// [`SkipIndex::iter`]: crate::SkipIndex::iter
pub struct Iter<'a, K, V> {
    nodes:     &'a NodeArena<K, V>,
    /// The next level-0 node to yield.
    next:      Link,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    #[inline]
    #[must_use]
    pub(crate) const fn new(nodes: &'a NodeArena<K, V>, first: Link, len: usize) -> Self {
        Self {
            nodes,
            next:      first,
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        self.next = self.nodes.get(current).next;
        self.remaining = self.remaining.saturating_sub(1);
        self.nodes.entry(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            nodes:     self.nodes,
            next:      self.next,
            remaining: self.remaining,
        }
    }
}

impl<K, V> Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}
