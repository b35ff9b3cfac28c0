//! A single-threaded, in-memory ordered index built as a [skip list].
//!
//! [`SkipIndex`] maps keys to values, keeping the keys sorted by their [`IndexKey`]
//! implementation. Besides exact lookups, it supports lookups with a bounded number of key
//! comparisons, "fuzzy" lookups which accept a near match, and navigation from any found entry
//! to its neighbors through [`NodeRef`] handles.
//!
//! ```
//! use anchored_skipindex::{SearchMode, SkipIndex};
//!
//! let mut index = SkipIndex::new();
//! index.insert(3_u32, "three");
//! index.insert(1, "one");
//! index.insert(2, "two");
//!
//! let two = index.find(&2, 0, SearchMode::Exact).unwrap();
//! assert_eq!(two.bottom().prev().map(|node| *node.value()), Some("one"));
//! assert_eq!(index.sort(), [&"one", &"two", &"three"]);
//! ```
//!
//! [skip list]: https://en.wikipedia.org/wiki/Skip_list

mod node;

mod display;
mod iter;
mod key;
mod list;
mod node_ref;
mod options;
mod promotion;


pub use self::{
    display::LevelsDisplay,
    iter::Iter,
    key::IndexKey,
    list::{SearchMode, SkipIndex},
    node_ref::NodeRef,
    options::{OptionsError, SkipIndexOptions},
    promotion::{CoinFlip, DEFAULT_SEED, MAX_LEVELS, Promotion},
};
