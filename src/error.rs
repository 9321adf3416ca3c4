use std::path::PathBuf;

/// Errors raised while building a [`PrefixTrie`](crate::PrefixTrie).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrieError {
    /// Octets index child slots directly, so the fanout must be in `1..=256`.
    #[error("fanout must be between 1 and 256, got {0}")]
    InvalidFanout(u32),
}

/// Why one input line was rejected.
///
/// All variants are per-line and recoverable: the driver counts them and
/// keeps going.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty line")]
    Empty,
    #[error("line is not valid UTF-8")]
    NotUtf8,
    #[error("not an IPv4 address: {line:?}")]
    NotIpv4 { line: String },
}

/// Errors that abort a counting run.
#[derive(Debug, thiserror::Error)]
pub enum CountError {
    #[error("failed to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read input after {lines} lines")]
    Read {
        lines: u64,
        #[source]
        source: std::io::Error,
    },
}
