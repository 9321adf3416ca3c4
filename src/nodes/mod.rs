mod presence;
mod trie_node;

pub(crate) use trie_node::TrieNode;
