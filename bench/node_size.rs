use octet_trie::PrefixTrie;
use rand::Rng;

fn bench_workload(key_gen: impl Fn(usize) -> u32) {
    let mut trie = PrefixTrie::new();

    let value_cnt = 100_000_000;
    for i in 0..value_cnt {
        let [a, b, c, d] = key_gen(i).to_be_bytes();
        trie.insert(a, b, c, d);
        if i % 10_000_000 == 0 {
            let stats = trie.stats();
            println!(
                "inserted: {} keys, unique: {}, allocated: {} bytes",
                i,
                stats.unique_addresses(),
                stats.total_memory_bytes()
            );
        }
    }

    let stats = trie.stats();
    println!(
        "total keys: {}, unique: {}, total allocated: {} bytes, {:.2} bytes per unique key",
        value_cnt,
        stats.unique_addresses(),
        stats.total_memory_bytes(),
        stats.total_memory_bytes() as f64 / stats.unique_addresses().max(1) as f64,
    );
    println!("{}", stats);
}

fn main() {
    println!("====sequential_keys====");
    bench_workload(|i| i as u32);

    println!("====random_keys====");
    bench_workload(|_i| rand::thread_rng().gen());

    println!("====one_slash_8====");
    bench_workload(|_i| 0x0a00_0000 | (rand::thread_rng().gen::<u32>() & 0x00ff_ffff));
}
