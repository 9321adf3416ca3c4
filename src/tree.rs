use std::net::Ipv4Addr;

use crate::{error::TrieError, nodes::TrieNode, stats::TrieStats};

/// Octets walked as child keys before the terminal octet lands in a presence set.
pub(crate) const INNER_LEVELS: usize = 3;

/// Default branching factor, one slot per octet value.
pub const DEFAULT_FANOUT: u32 = 256;

/// A set of IPv4 addresses that only answers "how many distinct ones".
///
/// Addresses are stored as a three-level trie keyed by the first three octets,
/// and the fourth octet is a bit in a presence set hanging off the third-level
/// node. Insertion is single-writer (`&mut self`), counting is read-only and
/// fans out across the rayon pool.
pub struct PrefixTrie {
    root: TrieNode,
    inserted: u64,
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie {
    /// Creates an empty trie with a fanout of 256.
    ///
    /// # Examples
    ///
    /// ```
    /// use octet_trie::PrefixTrie;
    /// let trie = PrefixTrie::new();
    /// assert_eq!(trie.count_unique(), 0);
    /// ```
    pub fn new() -> Self {
        PrefixTrie {
            root: TrieNode::new(DEFAULT_FANOUT as u16),
            inserted: 0,
        }
    }

    /// Creates an empty trie with a custom fanout.
    ///
    /// Octets at or above `fanout` make [`PrefixTrie::insert`] panic, so anything
    /// below 256 is only useful for address spaces known to be narrow.
    ///
    /// # Examples
    ///
    /// ```
    /// use octet_trie::{PrefixTrie, TrieError};
    /// let trie = PrefixTrie::with_fanout(16).unwrap();
    /// assert_eq!(trie.fanout(), 16);
    ///
    /// assert_eq!(PrefixTrie::with_fanout(0).err(), Some(TrieError::InvalidFanout(0)));
    /// assert!(PrefixTrie::with_fanout(257).is_err());
    /// ```
    pub fn with_fanout(fanout: u32) -> Result<Self, TrieError> {
        if fanout == 0 || fanout > DEFAULT_FANOUT {
            return Err(TrieError::InvalidFanout(fanout));
        }
        Ok(PrefixTrie {
            root: TrieNode::new(fanout as u16),
            inserted: 0,
        })
    }

    #[inline]
    pub fn fanout(&self) -> u32 {
        u32::from(self.root.fanout())
    }

    /// Records one address. Returns true if it had not been seen before.
    ///
    /// # Panics
    ///
    /// Panics if any octet is not below [`PrefixTrie::fanout`].
    ///
    /// # Examples
    ///
    /// ```
    /// use octet_trie::PrefixTrie;
    /// let mut trie = PrefixTrie::new();
    /// assert!(trie.insert(1, 2, 3, 4));
    /// assert!(!trie.insert(1, 2, 3, 4)); // already present
    /// assert!(trie.insert(1, 2, 3, 5));
    /// assert_eq!(trie.count_unique(), 2);
    /// ```
    #[inline]
    pub fn insert(&mut self, o0: u8, o1: u8, o2: u8, o3: u8) -> bool {
        self.inserted += 1;
        self.root
            .get_or_create_child(o0)
            .get_or_create_child(o1)
            .get_or_create_child(o2)
            .mark(o3)
    }

    /// Same as [`PrefixTrie::insert`], taking the octets from an [`Ipv4Addr`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::net::Ipv4Addr;
    /// use octet_trie::PrefixTrie;
    /// let mut trie = PrefixTrie::new();
    /// trie.insert_addr(Ipv4Addr::BROADCAST);
    /// assert!(trie.contains(Ipv4Addr::new(255, 255, 255, 255)));
    /// ```
    #[inline]
    pub fn insert_addr(&mut self, addr: Ipv4Addr) -> bool {
        let [o0, o1, o2, o3] = addr.octets();
        self.insert(o0, o1, o2, o3)
    }

    /// Checks whether `addr` has been inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::net::Ipv4Addr;
    /// use octet_trie::PrefixTrie;
    /// let mut trie = PrefixTrie::new();
    /// trie.insert(10, 0, 0, 1);
    /// assert!(trie.contains(Ipv4Addr::new(10, 0, 0, 1)));
    /// assert!(!trie.contains(Ipv4Addr::new(10, 0, 0, 2)));
    /// ```
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let [o0, o1, o2, o3] = addr.octets();
        let fanout = self.root.fanout() as usize;
        if addr.octets().iter().any(|&o| o as usize >= fanout) {
            return false;
        }
        self.root
            .child(o0)
            .and_then(|n| n.child(o1))
            .and_then(|n| n.child(o2))
            .is_some_and(|n| n.contains_leaf(o3))
    }

    /// Number of distinct addresses inserted so far.
    ///
    /// Sibling subtrees are reduced in parallel on the global rayon pool.
    ///
    /// # Examples
    ///
    /// ```
    /// use octet_trie::PrefixTrie;
    /// let mut trie = PrefixTrie::new();
    /// for x in 0..=255 {
    ///     trie.insert(10, 0, 0, x);
    /// }
    /// trie.insert(10, 0, 0, 7);
    /// assert_eq!(trie.count_unique(), 256);
    /// ```
    pub fn count_unique(&self) -> u64 {
        self.root.cardinality()
    }

    /// Single-threaded variant of [`PrefixTrie::count_unique`].
    ///
    /// # Examples
    ///
    /// ```
    /// use octet_trie::PrefixTrie;
    /// let mut trie = PrefixTrie::new();
    /// trie.insert(0, 0, 0, 0);
    /// trie.insert(255, 255, 255, 255);
    /// assert_eq!(trie.count_unique_sequential(), trie.count_unique());
    /// ```
    pub fn count_unique_sequential(&self) -> u64 {
        self.root.cardinality_sequential()
    }

    /// Number of `insert` calls, duplicates included.
    #[inline]
    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    /// Returns true if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        !self.root.has_child_array()
    }

    /// Per-level allocation statistics and an estimate of the heap in use.
    ///
    /// # Examples
    ///
    /// ```
    /// use octet_trie::PrefixTrie;
    /// let mut trie = PrefixTrie::new();
    /// trie.insert(192, 168, 0, 1);
    /// let stats = trie.stats();
    /// assert_eq!(stats.total_nodes(), 4);
    /// assert_eq!(stats.unique_addresses(), 1);
    /// ```
    pub fn stats(&self) -> TrieStats {
        TrieStats::collect(&self.root)
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> &TrieNode {
        &self.root
    }
}

impl Extend<Ipv4Addr> for PrefixTrie {
    fn extend<I: IntoIterator<Item = Ipv4Addr>>(&mut self, iter: I) {
        for addr in iter {
            self.insert_addr(addr);
        }
    }
}

impl FromIterator<Ipv4Addr> for PrefixTrie {
    fn from_iter<I: IntoIterator<Item = Ipv4Addr>>(iter: I) -> Self {
        let mut trie = PrefixTrie::new();
        trie.extend(iter);
        trie
    }
}

impl std::fmt::Debug for PrefixTrie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixTrie")
            .field("fanout", &self.fanout())
            .field("inserted", &self.inserted)
            .finish_non_exhaustive()
    }
}
