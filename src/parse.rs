use std::net::Ipv4Addr;

use crate::error::ParseError;

/// Classifies one raw input line as a dotted-quad IPv4 address.
///
/// A trailing `\n` or `\r\n` and surrounding ASCII whitespace are ignored.
/// The octet grammar is the one [`Ipv4Addr`]'s `FromStr` accepts: exactly four
/// decimal fields in `0..=255`, no leading zeros, nothing else on the line.
///
/// # Examples
///
/// ```
/// use octet_trie::{parse_line, ParseError};
/// assert_eq!(parse_line(b"10.0.0.1\r\n"), Ok([10, 0, 0, 1]));
/// assert_eq!(parse_line(b""), Err(ParseError::Empty));
/// assert!(parse_line(b"example.com").is_err());
/// ```
pub fn parse_line(line: &[u8]) -> Result<[u8; 4], ParseError> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let text = std::str::from_utf8(line).map_err(|_| ParseError::NotUtf8)?;
    text.parse::<Ipv4Addr>()
        .map(|addr| addr.octets())
        .map_err(|_| ParseError::NotIpv4 {
            line: text.to_owned(),
        })
}
