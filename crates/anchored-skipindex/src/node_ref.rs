use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::node::{NodeArena, NodeId};


/// A read-only handle to one node of a [`SkipIndex`], from which neighboring nodes can be
/// reached.
///
/// A handle only ever refers to a real entry, never to a level's header sentinel. Navigation
/// returns `None` at a boundary: past the end or start of the level, or below level 0.
///
/// A node above level 0 is a shortcut to the same entry as the level-0 node below it, so
/// [`key`] and [`value`] are the same on every level.
///
/// [`SkipIndex`]: crate::SkipIndex
/// [`key`]: NodeRef::key
/// [`value`]: NodeRef::value
pub struct NodeRef<'a, K, V> {
    nodes: &'a NodeArena<K, V>,
    id:    NodeId,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    /// `id` must refer to a live node which is not a header.
    #[inline]
    #[must_use]
    pub(crate) const fn new(nodes: &'a NodeArena<K, V>, id: NodeId) -> Self {
        Self { nodes, id }
    }

    /// The key and value of this node's entry.
    #[expect(clippy::expect_used, reason = "a `NodeRef` never refers to a header")]
    #[must_use]
    pub fn entry(&self) -> (&'a K, &'a V) {
        self.nodes.entry(self.id).expect("a `NodeRef` referred to a header")
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> &'a K {
        self.entry().0
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> &'a V {
        self.entry().1
    }

    /// The level this node is on. Level 0 holds every entry of the index.
    #[inline]
    #[must_use]
    pub fn level(&self) -> usize {
        self.nodes.get(self.id).level
    }

    /// The following node on the same level.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        self.nodes.get(self.id).next.map(|id| Self::new(self.nodes, id))
    }

    /// The preceding node on the same level, unless this is the level's first entry.
    #[must_use]
    pub fn prev(&self) -> Option<Self> {
        let prev = self.nodes.get(self.id).prev?;

        if self.nodes.get(prev).is_header() {
            None
        } else {
            Some(Self::new(self.nodes, prev))
        }
    }

    /// The node for the same entry one level below, unless this node is on level 0.
    #[must_use]
    pub fn down(&self) -> Option<Self> {
        self.nodes.get(self.id).down.map(|id| Self::new(self.nodes, id))
    }

    /// The level-0 node for this entry.
    #[must_use]
    pub fn bottom(&self) -> Self {
        Self::new(self.nodes, self.nodes.bottom(self.id))
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K: Debug, V: Debug> Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let (key, value) = self.entry();
        f.debug_struct("NodeRef")
            .field("key",   key)
            .field("value", value)
            .field("level", &self.level())
            .finish()
    }
}
