#![doc = include_str!("../README.md")]
#![cfg_attr(doc_cfg, feature(doc_cfg))]

mod counter;
mod error;
mod nodes;
mod parse;
mod stats;
mod tree;

#[cfg(feature = "cli")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "cli")))]
pub mod logging;

#[cfg(test)]
mod tests;

pub use counter::{count_file, count_reader, CountOptions, CountReport};
pub use error::{CountError, ParseError, TrieError};
pub use parse::parse_line;
pub use stats::{LevelStats, TrieStats};
pub use tree::{PrefixTrie, DEFAULT_FANOUT};

/// Creates an empty trie with the given fanout.
///
/// # Examples
///
/// ```
/// let trie = octet_trie::new_tree(256).unwrap();
/// assert_eq!(octet_trie::count_unique(&trie), 0);
/// ```
pub fn new_tree(fanout: u32) -> Result<PrefixTrie, TrieError> {
    PrefixTrie::with_fanout(fanout)
}

/// Records one address in `tree`.
///
/// # Examples
///
/// ```
/// let mut trie = octet_trie::new_tree(256).unwrap();
/// octet_trie::insert(&mut trie, 127, 0, 0, 1);
/// assert_eq!(octet_trie::count_unique(&trie), 1);
/// ```
#[inline]
pub fn insert(tree: &mut PrefixTrie, o0: u8, o1: u8, o2: u8, o3: u8) {
    tree.insert(o0, o1, o2, o3);
}

/// Number of distinct addresses recorded in `tree`.
pub fn count_unique(tree: &PrefixTrie) -> u64 {
    tree.count_unique()
}
