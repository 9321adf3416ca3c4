use std::net::Ipv4Addr;
use std::time::Instant;

use octet_trie::{count_reader, CountOptions, PrefixTrie};
use rand::{thread_rng, Rng};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const INSERT_CNT: usize = 50_000_000;

fn bench_insert(name: &str, key_gen: impl Fn(usize) -> u32) -> PrefixTrie {
    let mut trie = PrefixTrie::new();
    let start = Instant::now();
    for i in 0..INSERT_CNT {
        trie.insert_addr(Ipv4Addr::from(key_gen(i)));
    }
    let elapsed = start.elapsed();
    println!(
        "{name}: {INSERT_CNT} inserts in {:?} ({:.1} Mops/s)",
        elapsed,
        INSERT_CNT as f64 / elapsed.as_secs_f64() / 1e6
    );
    trie
}

fn bench_count(trie: &PrefixTrie) {
    let start = Instant::now();
    let parallel = trie.count_unique();
    let par_time = start.elapsed();

    let start = Instant::now();
    let sequential = trie.count_unique_sequential();
    let seq_time = start.elapsed();

    assert_eq!(parallel, sequential);
    println!("  unique: {parallel}, parallel: {par_time:?}, sequential: {seq_time:?}");
}

fn bench_parse() {
    let mut rng = thread_rng();
    let mut input = String::with_capacity(16 * 5_000_000);
    for _ in 0..5_000_000 {
        input.push_str(&Ipv4Addr::from(rng.gen::<u32>()).to_string());
        input.push('\n');
    }

    let start = Instant::now();
    let report = count_reader(input.as_bytes(), &CountOptions::default().with_progress_interval(0))
        .unwrap();
    println!(
        "parse+insert: {} lines in {:?}, {} unique",
        report.total_lines,
        start.elapsed(),
        report.unique
    );
}

fn main() {
    let trie = bench_insert("sequential_keys", |i| i as u32);
    bench_count(&trie);
    drop(trie);

    let trie = bench_insert("random_keys", |_i| thread_rng().gen());
    bench_count(&trie);
    drop(trie);

    bench_parse();
}
