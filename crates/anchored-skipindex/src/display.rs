use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

use crate::node::{Link, NodeArena};


/// A rendering of every level of a [`SkipIndex`], from the top level down.
///
/// Created by [`SkipIndex::levels_display`]. The output starts with the number of levels and
/// entries, followed by one line per level:
///
/// ```text
/// levels: 2
/// len: 3
/// level 1: [2: "b"]
/// level 0: [1: "a"] --> [2: "b"] --> [3: "c"]
/// ```
///
/// Keys and values are written with their [`Debug`] implementations.
///
/// [`SkipIndex`]: crate::SkipIndex
/// [`SkipIndex::levels_display`]: crate::SkipIndex::levels_display
pub struct LevelsDisplay<'a, K, V> {
    nodes:  &'a NodeArena<K, V>,
    top:    Link,
    levels: usize,
    len:    usize,
}

impl<'a, K, V> LevelsDisplay<'a, K, V> {
    #[inline]
    #[must_use]
    pub(crate) const fn new(
        nodes:  &'a NodeArena<K, V>,
        top:    Link,
        levels: usize,
        len:    usize,
    ) -> Self {
        Self { nodes, top, levels, len }
    }
}

impl<K: Debug, V: Debug> Display for LevelsDisplay<'_, K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "levels: {}", self.levels)?;
        writeln!(f, "len: {}", self.len)?;

        let mut header = self.top;
        while let Some(header_id) = header {
            let header_node = self.nodes.get(header_id);
            write!(f, "level {}:", header_node.level)?;

            let mut current = header_node.next;
            let mut first = true;
            while let Some(id) = current {
                if let Some((key, value)) = self.nodes.entry(id) {
                    let separator = if first { " " } else { " --> " };
                    write!(f, "{separator}[{key:?}: {value:?}]")?;
                    first = false;
                }
                current = self.nodes.get(id).next;
            }

            writeln!(f)?;
            header = header_node.down;
        }

        Ok(())
    }
}

impl<K, V> Debug for LevelsDisplay<'_, K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LevelsDisplay")
            .field("levels", &self.levels)
            .field("len",    &self.len)
            .finish_non_exhaustive()
    }
}
