use std::collections::HashSet;
use std::net::Ipv4Addr;

use rand::prelude::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::PrefixTrie;

#[test]
fn empty_tree() {
    let trie = PrefixTrie::new();
    assert_eq!(trie.count_unique(), 0);
    assert_eq!(trie.count_unique_sequential(), 0);
    assert_eq!(trie.inserted(), 0);
    assert!(trie.is_empty());
}

#[test]
fn duplicate_inserts_count_once() {
    let mut trie = PrefixTrie::new();
    for _ in 0..1_000 {
        trie.insert(9, 9, 9, 9);
    }
    assert_eq!(trie.count_unique(), 1);
    assert_eq!(trie.inserted(), 1_000);
}

#[test]
fn scenario_mixed_prefixes() {
    let mut trie = PrefixTrie::new();
    trie.insert(1, 2, 3, 4);
    trie.insert(1, 2, 3, 4);
    trie.insert(1, 2, 3, 5);
    trie.insert(1, 2, 4, 4);
    assert_eq!(trie.count_unique(), 3);
}

#[test]
fn boundary_addresses() {
    let mut trie = PrefixTrie::new();
    assert!(trie.insert_addr(Ipv4Addr::UNSPECIFIED));
    assert_eq!(trie.count_unique(), 1);
    assert!(trie.insert_addr(Ipv4Addr::BROADCAST));
    assert_eq!(trie.count_unique(), 2);
    assert!(trie.contains(Ipv4Addr::new(0, 0, 0, 0)));
    assert!(trie.contains(Ipv4Addr::new(255, 255, 255, 255)));
}

#[test]
fn full_last_octet_fills_one_presence_set() {
    let mut trie = PrefixTrie::new();
    for x in 0..=255u8 {
        trie.insert(10, 0, 0, x);
    }

    let leaf = trie
        .root()
        .child(10)
        .and_then(|n| n.child(0))
        .and_then(|n| n.child(0))
        .unwrap();
    assert_eq!(leaf.presence_count(), 256);
    assert!(leaf.children().next().is_none());
    assert_eq!(trie.count_unique(), 256);
}

#[test]
fn octet_to_level_mapping() {
    let mut trie = PrefixTrie::new();
    trie.insert(1, 2, 3, 4);

    let root = trie.root();
    assert_eq!(root.presence_count(), 0);
    let l1 = root.child(1).unwrap();
    assert!(root.child(4).is_none());
    let l2 = l1.child(2).unwrap();
    let l3 = l2.child(3).unwrap();
    assert!(l3.contains_leaf(4));
    assert!(!l3.has_child_array());
    assert_eq!(l1.presence_count() + l2.presence_count(), 0);
}

#[test]
fn matches_hash_set_on_random_workload() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut trie = PrefixTrie::new();
    let mut reference = HashSet::new();

    // Narrow first octets so prefixes collide often.
    for _ in 0..200_000 {
        let addr = Ipv4Addr::new(rng.gen_range(0..4), rng.gen(), rng.gen_range(0..16), rng.gen());
        trie.insert_addr(addr);
        reference.insert(addr);
    }

    assert_eq!(trie.count_unique(), reference.len() as u64);
    assert_eq!(trie.count_unique_sequential(), reference.len() as u64);
    assert_eq!(trie.stats().unique_addresses(), reference.len() as u64);
    for addr in reference.iter().take(1_000) {
        assert!(trie.contains(*addr));
    }
}

#[test]
fn insertion_order_does_not_matter() {
    let mut keys: Vec<u32> = (0..50_000u32).map(|i| i.wrapping_mul(2_654_435_761)).collect();
    let mut forward = PrefixTrie::new();
    forward.extend(keys.iter().map(|&k| Ipv4Addr::from(k)));

    let mut r = StdRng::seed_from_u64(7);
    keys.shuffle(&mut r);
    let shuffled: PrefixTrie = keys.iter().map(|&k| Ipv4Addr::from(k)).collect();

    assert_eq!(forward.count_unique(), shuffled.count_unique());
    assert_eq!(forward.stats(), shuffled.stats());
}

#[test]
fn parallel_matches_sequential_on_wide_tree() {
    let mut trie = PrefixTrie::new();
    for a in 0..=255u8 {
        for b in (0..=255u8).step_by(17) {
            trie.insert(a, b, a ^ b, a.wrapping_add(b));
            trie.insert(a, b, b, a);
        }
    }
    assert_eq!(trie.count_unique(), trie.count_unique_sequential());
    assert!(trie.count_unique() <= trie.inserted());
}

#[test]
fn small_fanout_tree() {
    let mut trie = PrefixTrie::with_fanout(4).unwrap();
    for a in 0..4 {
        for b in 0..4 {
            trie.insert(a, b, 3, 0);
        }
    }
    assert_eq!(trie.count_unique(), 16);
    assert!(!trie.contains(Ipv4Addr::new(200, 0, 0, 0)));
}

#[should_panic]
#[test]
fn octet_beyond_fanout_panics() {
    let mut trie = PrefixTrie::with_fanout(8).unwrap();
    trie.insert(1, 2, 3, 8);
}
