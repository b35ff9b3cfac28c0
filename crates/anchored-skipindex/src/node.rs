/// A stable handle to a slot of a [`NodeArena`].
///
/// A `NodeId` stays valid until its node is freed; the slot may later be reused for a different
/// node, so the index never holds onto an id past the node's removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

pub(crate) type Link = Option<NodeId>;


/// What a node stands for.
#[derive(Debug, Clone)]
pub(crate) enum Payload<K, V> {
    /// The keyless sentinel at the start of a level.
    Header,
    /// A level-0 node, which owns the key and value of an entry. `highest` is the entry's
    /// replica on the highest level it reaches, or `None` if it is only on level 0.
    Entry { key: K, value: V, highest: Link },
    /// A node above level 0, standing in for the level-0 node `base` of the same key.
    Replica { base: NodeId },
}

/// One node of one level.
///
/// `prev` and `next` are the horizontal neighbors on `level`. `down` is the node representing the
/// same key (or, for a header, the header) one level below; it is `None` exactly on level 0.
/// A node with a `prev` of `None` is always a header.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub prev:    Link,
    pub next:    Link,
    pub down:    Link,
    pub level:   usize,
    pub payload: Payload<K, V>,
}

impl<K, V> Node<K, V> {
    #[inline]
    #[must_use]
    pub fn is_header(&self) -> bool {
        matches!(self.payload, Payload::Header)
    }
}

/// Contiguous storage for every node of an index, with a free list for reusing the slots of
/// removed nodes.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free:  Vec<NodeId>,
}

#[expect(unreachable_pub, reason = "control visibility at type definition")]
impl<K, V> NodeArena<K, V> {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free:  Vec::new(),
        }
    }

    #[must_use]
    pub fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        if let Some(id) = self.free.pop() {
            #[expect(clippy::indexing_slicing, reason = "freed ids were handed out by `alloc`")]
            let slot = &mut self.slots[id.0];
            *slot = Some(node);
            id
        } else {
            let id = NodeId(self.slots.len());
            self.slots.push(Some(node));
            id
        }
    }

    /// Remove the node from the arena, returning it.
    ///
    /// # Panics
    /// Panics if `id` does not refer to a live node.
    pub fn free(&mut self, id: NodeId) -> Node<K, V> {
        #[expect(clippy::indexing_slicing, reason = "ids are only handed out by `alloc`")]
        let slot = self.slots[id.0].take();
        #[expect(clippy::expect_used, reason = "the index never frees a node twice")]
        let node = slot.expect("a freed `NodeId` was used");
        self.free.push(id);
        node
    }

    /// # Panics
    /// Panics if `id` does not refer to a live node.
    #[expect(
        clippy::indexing_slicing, clippy::expect_used,
        reason = "ids are only handed out by `alloc`, and the index only follows live links",
    )]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node<K, V> {
        self.slots[id.0].as_ref().expect("a freed `NodeId` was used")
    }

    /// # Panics
    /// Panics if `id` does not refer to a live node.
    #[expect(
        clippy::indexing_slicing, clippy::expect_used,
        reason = "ids are only handed out by `alloc`, and the index only follows live links",
    )]
    #[must_use]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.slots[id.0].as_mut().expect("a freed `NodeId` was used")
    }

    /// Follow `down` links to the level-0 node representing the same key (or header) as `id`.
    #[must_use]
    pub fn bottom(&self, mut id: NodeId) -> NodeId {
        while let Some(down) = self.get(id).down {
            id = down;
        }
        id
    }

    /// The level-0 node whose key and value `id` stands for. `None` for headers.
    #[must_use]
    fn base(&self, id: NodeId) -> Option<NodeId> {
        match &self.get(id).payload {
            Payload::Header           => None,
            Payload::Entry { .. }     => Some(id),
            Payload::Replica { base } => Some(*base),
        }
    }

    /// The key and value that `id` stands for. `None` for headers.
    #[must_use]
    pub fn entry(&self, id: NodeId) -> Option<(&K, &V)> {
        match &self.get(self.base(id)?).payload {
            Payload::Entry { key, value, .. } => Some((key, value)),
            Payload::Header | Payload::Replica { .. } => None,
        }
    }

    /// The node on the highest level that stands for the same entry as `id`. `None` for headers.
    #[must_use]
    pub fn highest(&self, id: NodeId) -> Option<NodeId> {
        let base = self.base(id)?;
        match &self.get(base).payload {
            Payload::Entry { highest, .. } => Some(highest.unwrap_or(base)),
            Payload::Header | Payload::Replica { .. } => None,
        }
    }

    /// Record `replica` as the highest node standing for the entry of `base`.
    pub fn set_highest(&mut self, base: NodeId, replica: NodeId) {
        if let Payload::Entry { highest, .. } = &mut self.get_mut(base).payload {
            *highest = Some(replica);
        }
    }

    #[must_use]
    pub fn key(&self, id: NodeId) -> Option<&K> {
        self.entry(id).map(|(key, _)| key)
    }

    #[must_use]
    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        let base = self.base(id)?;
        match &mut self.get_mut(base).payload {
            Payload::Entry { value, .. } => Some(value),
            Payload::Header | Payload::Replica { .. } => None,
        }
    }

    /// The number of live nodes, headers included.
    #[cfg(test)]
    #[must_use]
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Drop every node at once. All previously allocated ids become invalid.
    #[inline]
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
