use std::fmt::Display;

use crate::{nodes::TrieNode, tree::INNER_LEVELS};

/// Allocation statistics for a [`PrefixTrie`](crate::PrefixTrie), one entry per depth.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "stats", derive(serde::Serialize))]
pub struct TrieStats(Vec<LevelStats>);

/// Counters for every node at one depth (0 is the root).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "stats", derive(serde::Serialize))]
pub struct LevelStats {
    pub level: usize,
    pub nodes: usize,
    pub child_arrays: usize,
    pub presence_sets: usize,
    pub marked: u64,
    pub heap_bytes: usize,
}

impl LevelStats {
    fn new_level(level: usize) -> Self {
        Self {
            level,
            nodes: 0,
            child_arrays: 0,
            presence_sets: 0,
            marked: 0,
            heap_bytes: 0,
        }
    }
}

impl TrieStats {
    pub(crate) fn collect(root: &TrieNode) -> Self {
        let mut levels: Vec<LevelStats> = (0..=INNER_LEVELS).map(LevelStats::new_level).collect();

        let mut sub_nodes = vec![(0usize, root)];
        while let Some((level, node)) = sub_nodes.pop() {
            if levels.len() <= level {
                levels.push(LevelStats::new_level(level));
            }
            let l = &mut levels[level];
            l.nodes += 1;
            l.child_arrays += usize::from(node.has_child_array());
            l.presence_sets += usize::from(node.presence().is_some());
            l.marked += node.presence_count();
            // The root lives inline in `PrefixTrie`, every other node is boxed.
            let header = if level == 0 { 0 } else { std::mem::size_of::<TrieNode>() };
            l.heap_bytes += header + node.own_heap_bytes();

            for (_k, child) in node.children() {
                sub_nodes.push((level + 1, child));
            }
        }

        TrieStats(levels)
    }

    pub fn levels(&self) -> &[LevelStats] {
        &self.0
    }

    pub fn total_nodes(&self) -> usize {
        self.0.iter().map(|l| l.nodes).sum()
    }

    /// Estimated heap footprint: boxed node headers plus child arrays plus presence words.
    pub fn total_memory_bytes(&self) -> usize {
        self.0.iter().map(|l| l.heap_bytes).sum()
    }

    /// Set bits across all presence sets, equal to the distinct address count.
    pub fn unique_addresses(&self) -> u64 {
        self.0.iter().map(|l| l.marked).sum()
    }
}

impl Display for TrieStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for l in self.0.iter() {
            writeln!(
                f,
                "Level: {} --- || nodes: {:10} || child arrays: {:10} || presence sets: {:10} || marked: {:12} || bytes: {:14} ||",
                l.level, l.nodes, l.child_arrays, l.presence_sets, l.marked, l.heap_bytes,
            )?;
        }
        writeln!(f, "Total memory: {} bytes", self.total_memory_bytes())
    }
}
