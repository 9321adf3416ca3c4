#![no_main]
use libfuzzer_sys::fuzz_target;
use octet_trie::parse_line;
use std::net::Ipv4Addr;

fuzz_target!(|data: &[u8]| {
    if let Ok(octets) = parse_line(data) {
        // Anything accepted must round-trip through the canonical form.
        let canonical = Ipv4Addr::from(octets).to_string();
        assert_eq!(parse_line(canonical.as_bytes()), Ok(octets));
    }
});
