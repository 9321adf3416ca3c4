use rayon::prelude::*;

use super::presence::PresenceSet;

type ChildSlots = Box<[Option<Box<TrieNode>>]>;

/// One node of the prefix-presence trie.
///
/// Both the child array and the presence set are allocated on first write and
/// never shrink, so memory follows the number of distinct prefixes seen.
pub(crate) struct TrieNode {
    fanout: u16,
    children: Option<ChildSlots>,
    presence: Option<PresenceSet>,
}

impl TrieNode {
    pub(crate) fn new(fanout: u16) -> Self {
        debug_assert!(fanout > 0 && fanout <= 256);
        Self {
            fanout,
            children: None,
            presence: None,
        }
    }

    #[inline]
    pub(crate) fn fanout(&self) -> u16 {
        self.fanout
    }

    #[inline]
    fn check_index(&self, index: u8) -> usize {
        let index = index as usize;
        assert!(
            index < self.fanout as usize,
            "octet {index} out of range for fanout {}",
            self.fanout
        );
        index
    }

    /// Find-or-insert the child at `index`.
    pub(crate) fn get_or_create_child(&mut self, index: u8) -> &mut TrieNode {
        let idx = self.check_index(index);
        let fanout = self.fanout;
        let children = self.children.get_or_insert_with(|| {
            std::iter::repeat_with(|| None)
                .take(fanout as usize)
                .collect()
        });
        children[idx].get_or_insert_with(|| Box::new(TrieNode::new(fanout)))
    }

    #[inline]
    pub(crate) fn child(&self, index: u8) -> Option<&TrieNode> {
        let idx = self.check_index(index);
        self.children.as_ref()?[idx].as_deref()
    }

    /// Iterates over `(key, child)` for every allocated child slot.
    pub(crate) fn children(&self) -> impl Iterator<Item = (u8, &TrieNode)> + '_ {
        self.children.iter().flat_map(|slots| {
            slots
                .iter()
                .enumerate()
                .filter_map(|(k, c)| c.as_deref().map(|c| (k as u8, c)))
        })
    }

    /// Marks terminal octet `index` as seen, returns true if it was new.
    #[inline]
    pub(crate) fn mark(&mut self, index: u8) -> bool {
        let idx = self.check_index(index);
        let fanout = self.fanout as usize;
        self.presence
            .get_or_insert_with(|| PresenceSet::new(fanout))
            .set(idx)
    }

    #[inline]
    pub(crate) fn contains_leaf(&self, index: u8) -> bool {
        let idx = self.check_index(index);
        self.presence.as_ref().is_some_and(|p| p.contains(idx))
    }

    pub(crate) fn presence(&self) -> Option<&PresenceSet> {
        self.presence.as_ref()
    }

    #[inline]
    pub(crate) fn presence_count(&self) -> u64 {
        self.presence.as_ref().map_or(0, PresenceSet::count_ones)
    }

    pub(crate) fn has_child_array(&self) -> bool {
        self.children.is_some()
    }

    /// Heap bytes owned directly by this node, excluding child nodes.
    pub(crate) fn own_heap_bytes(&self) -> usize {
        let slots = self
            .children
            .as_ref()
            .map_or(0, |c| std::mem::size_of_val(&**c));
        let presence = self.presence.as_ref().map_or(0, PresenceSet::memory_bytes);
        slots + presence
    }

    /// Distinct terminal values in this subtree; siblings are summed on the
    /// rayon pool.
    pub(crate) fn cardinality(&self) -> u64 {
        let own = self.presence_count();
        match &self.children {
            Some(children) => {
                own + children[..]
                    .par_iter()
                    .filter_map(|c| c.as_deref())
                    .map(TrieNode::cardinality)
                    .sum::<u64>()
            }
            None => own,
        }
    }

    /// Same value as [`TrieNode::cardinality`], computed on the calling
    /// thread only.
    pub(crate) fn cardinality_sequential(&self) -> u64 {
        self.presence_count()
            + self
                .children()
                .map(|(_, c)| c.cardinality_sequential())
                .sum::<u64>()
    }
}

impl std::fmt::Debug for TrieNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrieNode")
            .field("fanout", &self.fanout)
            .field("children", &self.children().count())
            .field("presence", &self.presence)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_allocation() {
        let mut node = TrieNode::new(256);
        assert!(!node.has_child_array());
        assert!(node.presence().is_none());
        assert_eq!(node.own_heap_bytes(), 0);

        node.mark(3);
        assert!(!node.has_child_array());
        assert!(node.presence().is_some());

        node.get_or_create_child(7);
        assert!(node.has_child_array());
        assert!(node.child(7).is_some());
        assert!(node.child(8).is_none());
    }

    #[test]
    fn test_get_or_create_is_find_or_insert() {
        let mut node = TrieNode::new(256);
        node.get_or_create_child(42).mark(1);
        // The second lookup must hand back the same child, not a fresh one.
        assert!(node.get_or_create_child(42).contains_leaf(1));
        assert_eq!(node.children().count(), 1);
    }

    #[test]
    fn test_mark_idempotent() {
        let mut node = TrieNode::new(256);
        assert!(node.mark(200));
        assert!(!node.mark(200));
        assert_eq!(node.presence_count(), 1);
        assert!(node.contains_leaf(200));
        assert!(!node.contains_leaf(201));
    }

    #[test]
    fn test_mark_does_not_touch_children() {
        let mut node = TrieNode::new(256);
        node.get_or_create_child(1);
        node.mark(1);
        assert_eq!(node.children().count(), 1);
        assert_eq!(node.child(1).unwrap().presence_count(), 0);
    }

    #[test]
    fn test_cardinality_sums_subtrees() {
        let mut root = TrieNode::new(256);
        for a in [0u8, 128, 255] {
            let leaf = root.get_or_create_child(a).get_or_create_child(a);
            for b in 0..=a {
                leaf.mark(b);
            }
        }
        let expected = 1 + 129 + 256;
        assert_eq!(root.cardinality(), expected);
        assert_eq!(root.cardinality_sequential(), expected);
    }

    #[test]
    fn test_children_in_key_order() {
        let mut node = TrieNode::new(256);
        for k in [250u8, 3, 99] {
            node.get_or_create_child(k);
        }
        let keys: Vec<u8> = node.children().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![3, 99, 250]);
    }

    #[test]
    fn test_small_fanout() {
        let mut node = TrieNode::new(4);
        node.get_or_create_child(3).mark(3);
        assert_eq!(node.cardinality(), 1);
    }

    #[should_panic]
    #[test]
    fn test_index_beyond_fanout() {
        let mut node = TrieNode::new(4);
        node.get_or_create_child(4);
    }
}
