#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use octet_trie::PrefixTrie;
use std::collections::HashSet;
use std::net::Ipv4Addr;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { key: u32 },
    // Same /24 as the previous insert, to exercise shared presence sets.
    Neighbour { last_octet: u8 },
}

fuzz_target!(|ops: Vec<Op>| {
    let mut trie = PrefixTrie::new();
    let mut hs = HashSet::new();
    let mut last = 0u32;

    for op in ops.iter() {
        let key = match op {
            Op::Insert { key } => *key,
            Op::Neighbour { last_octet } => (last & 0xffff_ff00) | u32::from(*last_octet),
        };
        last = key;

        let fresh = hs.insert(key);
        assert_eq!(trie.insert_addr(Ipv4Addr::from(key)), fresh);
    }

    assert_eq!(trie.count_unique(), hs.len() as u64);
    assert_eq!(trie.count_unique_sequential(), hs.len() as u64);
    assert_eq!(trie.stats().unique_addresses(), hs.len() as u64);

    for key in hs.iter() {
        assert!(trie.contains(Ipv4Addr::from(*key)));
    }
});
