use std::mem;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use tracing::Level;

use crate::{display::LevelsDisplay, iter::Iter, key::IndexKey, node_ref::NodeRef};
use crate::node::{Link, Node, NodeArena, NodeId, Payload};
use crate::options::{OptionsError, SkipIndexOptions};
use crate::promotion::{CoinFlip, MAX_LEVELS, Promotion};


/// Which keys a [`SkipIndex::find`] lookup accepts.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    /// Only a key which is [`equal`] to the target.
    ///
    /// [`equal`]: IndexKey::equal
    #[default]
    Exact,
    /// Either a key which is [`equal`] to the target, or the first key examined along the search
    /// path which is a [`near_match`] for the target.
    ///
    /// [`equal`]: IndexKey::equal
    /// [`near_match`]: IndexKey::near_match
    Fuzzy,
}

/// The result of searching for a key.
#[derive(Debug)]
enum Located {
    /// The first node found holding an accepted key. With a consistent key order, this is on
    /// the key's highest level.
    Found(NodeId),
    Missing {
        /// For each level, from the top level down, the last node (possibly the header) whose key
        /// is less than the target. Incomplete if the search gave up early.
        predecessors: Vec<NodeId>,
        /// The last node visited; after a complete search, the level-0 predecessor of the target.
        /// `None` only if the index has no levels.
        floor:        Link,
    },
}

/// An ordered map built as a stack of linked levels (a [skip list]).
///
/// Level 0 is a sorted linked list of every entry. Each level above it holds a random subset of
/// the keys of the level below, so that lookups can skip ahead before descending. How many
/// levels a new key reaches is decided by the index's [`Promotion`] strategy.
///
/// Keys are ordered by their [`IndexKey`] implementation; a key is stored at most once, and
/// inserting an existing key replaces its value.
///
/// The index is single-threaded: mutation takes `&mut self`, and reads through `&self` never
/// mutate anything.
///
/// [skip list]: https://en.wikipedia.org/wiki/Skip_list
#[derive(Clone)]
pub struct SkipIndex<K, V, P = CoinFlip> {
    nodes:     NodeArena<K, V>,
    /// The header of the top level. `None` if and only if there are no levels.
    top:       Link,
    levels:    usize,
    len:       usize,
    promotion: P,
}

impl<K, V> SkipIndex<K, V, CoinFlip> {
    /// An empty index, promoting keys with a fair coin seeded with [`DEFAULT_SEED`].
    ///
    /// [`DEFAULT_SEED`]: crate::DEFAULT_SEED
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_promotion(CoinFlip::default())
    }

    /// An empty index, promoting keys with a fair coin seeded with `seed`.
    #[inline]
    #[must_use]
    pub fn new_seeded(seed: u64) -> Self {
        Self::with_promotion(CoinFlip::new(seed))
    }

    /// An empty index whose promotion coin is described by `options`.
    pub fn with_options(options: SkipIndexOptions) -> Result<Self, OptionsError> {
        let coin = options.coin_flip()?;

        tracing::event!(
            Level::DEBUG,
            numerator = options.promotion_numerator,
            denominator = options.promotion_denominator,
            seed = options.seed,
            "building a skip index"
        );

        Ok(Self::with_promotion(coin))
    }
}

impl<K, V> Default for SkipIndex<K, V, CoinFlip> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// Constructors and accessors which do not compare keys.
impl<K, V, P> SkipIndex<K, V, P> {
    /// An empty index which uses the provided strategy to decide how far up each new key
    /// is promoted.
    #[inline]
    #[must_use]
    pub const fn with_promotion(promotion: P) -> Self {
        Self {
            nodes:  NodeArena::new(),
            top:    None,
            levels: 0,
            len:    0,
            promotion,
        }
    }

    /// The number of distinct keys in the index.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of levels, including level 0. An empty index has no levels.
    #[inline]
    #[must_use]
    pub const fn levels(&self) -> usize {
        self.levels
    }

    #[inline]
    #[must_use]
    pub const fn promotion(&self) -> &P {
        &self.promotion
    }

    /// The entry with the least key.
    ///
    /// Descends the column of headers to level 0, then steps to the first entry.
    #[must_use]
    pub fn get_min(&self) -> Option<NodeRef<'_, K, V>> {
        let first = self.first_entry()?;
        Some(NodeRef::new(&self.nodes, first))
    }

    /// The entry with the greatest key.
    ///
    /// Starting from the top header, walks to the end of each level before descending.
    #[must_use]
    pub fn get_max(&self) -> Option<NodeRef<'_, K, V>> {
        let mut current = self.top?;

        loop {
            while let Some(next) = self.nodes.get(current).next {
                current = next;
            }

            match self.nodes.get(current).down {
                Some(down) => current = down,
                None => break,
            }
        }

        if self.nodes.get(current).is_header() {
            None
        } else {
            Some(NodeRef::new(&self.nodes, current))
        }
    }

    /// Every value in the index, in ascending key order.
    #[must_use]
    pub fn sort(&self) -> Vec<&V> {
        self.iter().map(|(_, value)| value).collect()
    }

    /// Iterate over the entries of the index in ascending key order.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, self.first_entry(), self.len)
    }

    /// Remove every entry and level.
    pub fn clear_all(&mut self) {
        tracing::event!(
            Level::DEBUG,
            len = self.len,
            levels = self.levels,
            "clearing a skip index"
        );

        self.nodes.clear();
        self.top = None;
        self.levels = 0;
        self.len = 0;
    }

    /// Render every level of the index, from the top level down.
    #[inline]
    #[must_use]
    pub const fn levels_display(&self) -> LevelsDisplay<'_, K, V> {
        LevelsDisplay::new(&self.nodes, self.top, self.levels, self.len)
    }

    /// The first level-0 node after the level-0 header.
    fn first_entry(&self) -> Link {
        let mut header = self.top?;

        while let Some(down) = self.nodes.get(header).down {
            header = down;
        }

        self.nodes.get(header).next
    }

    /// Create a header for a new top level, above the current top level.
    fn push_level(&mut self) -> NodeId {
        let header = self.nodes.alloc(Node {
            prev:    None,
            next:    None,
            down:    self.top,
            level:   self.levels,
            payload: Payload::Header,
        });

        self.top = Some(header);
        self.levels += 1;

        if self.levels > 1 {
            tracing::event!(Level::TRACE, levels = self.levels, "added a skip index level");
        }

        header
    }

    /// Create a node for `payload` directly after `prev`, on `prev`'s level.
    fn link_after(&mut self, prev: NodeId, payload: Payload<K, V>, down: Link) -> NodeId {
        let prev_node = self.nodes.get(prev);
        let (level, next) = (prev_node.level, prev_node.next);

        let node = self.nodes.alloc(Node {
            prev: Some(prev),
            next,
            down,
            level,
            payload,
        });

        self.nodes.get_mut(prev).next = Some(node);
        if let Some(next) = next {
            self.nodes.get_mut(next).prev = Some(node);
        }

        node
    }

    /// Remove a node from its level and from the arena.
    fn unlink(&mut self, id: NodeId) -> Node<K, V> {
        let node = self.nodes.free(id);

        if let Some(prev) = node.prev {
            self.nodes.get_mut(prev).next = node.next;
        }
        if let Some(next) = node.next {
            self.nodes.get_mut(next).prev = node.prev;
        }

        node
    }

    /// Drop levels from the top while the top level has no entries.
    fn collapse_empty_levels(&mut self) {
        while let Some(top) = self.top {
            if self.nodes.get(top).next.is_some() {
                break;
            }

            let header = self.nodes.free(top);
            debug_assert!(header.is_header(), "a level started with a non-header node");
            self.top = header.down;
            self.levels -= 1;

            tracing::event!(Level::TRACE, levels = self.levels, "collapsed a skip index level");
        }

        if self.top.is_none() {
            // Every slot is on the free list; there is nothing left to reuse them for.
            self.nodes.clear();
        }
    }
}

impl<K: IndexKey, V, P> SkipIndex<K, V, P> {
    /// Search downward and forward for `key`.
    ///
    /// On each level, the search advances while the next node's key is not greater than `key`,
    /// and descends when it is greater or when the level ends. Every examination of a node's key
    /// counts as one comparison; if `search_limit` is nonzero and the search would need more than
    /// `search_limit` comparisons, it gives up and reports the key as missing.
    fn locate(&self, key: &K, mode: SearchMode, search_limit: usize) -> Located {
        let mut predecessors = Vec::with_capacity(self.levels);
        let Some(mut current) = self.top else {
            return Located::Missing { predecessors, floor: None };
        };
        let mut comparisons: usize = 0;

        loop {
            let node = self.nodes.get(current);

            if let Some(next) = node.next {
                comparisons += 1;
                if search_limit != 0 && comparisons > search_limit {
                    tracing::event!(Level::TRACE, search_limit, "bounded skip index search gave up");
                    return Located::Missing { predecessors, floor: Some(current) };
                }

                #[expect(clippy::expect_used, reason = "headers only ever start a level")]
                let next_key = self.nodes.key(next).expect("a header was linked mid-level");

                if key.equal(next_key) || (mode == SearchMode::Fuzzy && key.near_match(next_key)) {
                    return Located::Found(next);
                }
                if !key.less(next_key) {
                    current = next;
                    continue;
                }
            }

            predecessors.push(current);

            match node.down {
                Some(down) => current = down,
                None => return Located::Missing { predecessors, floor: Some(current) },
            }
        }
    }

    /// Look up `key`, returning the highest node holding it.
    ///
    /// A `search_limit` of `0` allows an unlimited number of comparisons. Otherwise, at most
    /// `search_limit` keys are examined; if the key is not reached within that budget, `None` is
    /// returned even if the key is present.
    ///
    /// With [`SearchMode::Fuzzy`], the first examined key which is a [`near_match`] for `key` is
    /// accepted as well. Which near match is found depends on the shape of the index, not only on
    /// the order of keys.
    ///
    /// [`near_match`]: IndexKey::near_match
    #[must_use]
    pub fn find(&self, key: &K, search_limit: usize, mode: SearchMode) -> Option<NodeRef<'_, K, V>> {
        match self.locate(key, mode, search_limit) {
            Located::Found(node)     => Some(NodeRef::new(&self.nodes, node)),
            Located::Missing { .. } => None,
        }
    }

    /// The entry immediately before `key`'s position, whether or not `key` is present.
    #[must_use]
    pub fn find_left(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        let left = match self.locate(key, SearchMode::Exact, 0) {
            Located::Found(node) => self.nodes.get(self.nodes.bottom(node)).prev?,
            Located::Missing { floor, .. } => floor?,
        };

        if self.nodes.get(left).is_header() {
            None
        } else {
            Some(NodeRef::new(&self.nodes, left))
        }
    }

    /// The entry immediately after `key`'s position, whether or not `key` is present.
    #[must_use]
    pub fn find_right(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        let right = match self.locate(key, SearchMode::Exact, 0) {
            Located::Found(node) => self.nodes.get(self.nodes.bottom(node)).next?,
            Located::Missing { floor, .. } => self.nodes.get(floor?).next?,
        };

        Some(NodeRef::new(&self.nodes, right))
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        match self.locate(key, SearchMode::Exact, 0) {
            Located::Found(node)     => self.nodes.entry(node).map(|(_, value)| value),
            Located::Missing { .. } => None,
        }
    }

    #[must_use]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.locate(key, SearchMode::Exact, 0) {
            Located::Found(node)     => self.nodes.value_mut(node),
            Located::Missing { .. } => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        matches!(self.locate(key, SearchMode::Exact, 0), Located::Found(_))
    }

    /// Remove `key` from every level, returning its value. Does nothing if `key` is absent.
    ///
    /// Levels left without any entries are removed from the top of the index.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let Located::Found(found) = self.locate(key, SearchMode::Exact, 0) else {
            return None;
        };

        let mut removed = None;
        let mut current = self.nodes.highest(found);
        while let Some(id) = current {
            let node = self.unlink(id);
            current = node.down;

            if let Payload::Entry { value, .. } = node.payload {
                removed = Some(value);
            }
        }

        self.len -= 1;
        self.collapse_empty_levels();
        removed
    }
}

impl<K: IndexKey, V, P: Promotion> SkipIndex<K, V, P> {
    /// Insert `value` under `key`.
    ///
    /// If an equal key is already present, its value is replaced and the old value is returned;
    /// the structure of the index is unchanged. Otherwise, the key is linked into level 0 and
    /// then promoted upward one level at a time for as long as the promotion strategy agrees.
    /// Promotion past the current top level adds a new level (at most one per insertion, and
    /// never beyond [`MAX_LEVELS`]).
    ///
    /// [`MAX_LEVELS`]: crate::MAX_LEVELS
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let predecessors = match self.locate(&key, SearchMode::Exact, 0) {
            Located::Found(node) => {
                let old_value = self.nodes.value_mut(node)?;
                return Some(mem::replace(old_value, value));
            }
            Located::Missing { predecessors, .. } => predecessors,
        };

        // From level 0 upward.
        let mut predecessors = predecessors.into_iter().rev();

        let Some(floor) = predecessors.next() else {
            // The index has no levels. Its only level is created along with its first entry.
            let header = self.push_level();
            self.link_after(header, Payload::Entry { key, value, highest: None }, None);
            self.len += 1;
            return None;
        };

        let base = self.link_after(floor, Payload::Entry { key, value, highest: None }, None);
        self.len += 1;

        let mut below = base;
        let mut level = 0;
        while self.promotion.promote(level) {
            level += 1;

            if let Some(prev) = predecessors.next() {
                below = self.link_after(prev, Payload::Replica { base }, Some(below));
            } else if self.levels < MAX_LEVELS {
                let header = self.push_level();
                below = self.link_after(header, Payload::Replica { base }, Some(below));
                break;
            } else {
                break;
            }
        }

        if below != base {
            self.nodes.set_highest(base, below);
        }

        None
    }
}

impl<K: IndexKey, V, P: Promotion> Extend<(K, V)> for SkipIndex<K, V, P> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: IndexKey, V> FromIterator<(K, V)> for SkipIndex<K, V, CoinFlip> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

impl<'a, K, V, P> IntoIterator for &'a SkipIndex<K, V, P> {
    type Item     = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Debug, V: Debug, P> Debug for SkipIndex<K, V, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_map().entries(self.iter()).finish()
    }
}
