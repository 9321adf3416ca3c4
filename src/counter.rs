use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    time::{Duration, Instant},
};

use crate::{error::CountError, parse::parse_line, stats::TrieStats, PrefixTrie};

/// Tunables for a counting run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountOptions {
    /// Read buffer size in bytes.
    pub buffer_capacity: usize,
    /// Log progress every this many lines, 0 disables it.
    pub progress_interval: u64,
    /// Reduce the trie on the rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Stop logging rejected lines after this many; they are still counted.
    pub max_reported_errors: Option<u64>,
}

impl Default for CountOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: 32 * 1024 * 1024,
            progress_interval: 1_000_000,
            parallel: true,
            max_reported_errors: None,
        }
    }
}

impl CountOptions {
    pub fn with_buffer_capacity(mut self, bytes: usize) -> Self {
        self.buffer_capacity = bytes.max(1);
        self
    }

    pub fn with_progress_interval(mut self, lines: u64) -> Self {
        self.progress_interval = lines;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_reported_errors(mut self, limit: Option<u64>) -> Self {
        self.max_reported_errors = limit;
        self
    }
}

/// Outcome of one counting run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "stats", derive(serde::Serialize))]
pub struct CountReport {
    pub total_lines: u64,
    pub rejected_lines: u64,
    pub unique: u64,
    pub read_time: Duration,
    pub counting_time: Duration,
    pub stats: TrieStats,
}

impl CountReport {
    pub fn memory_bytes(&self) -> usize {
        self.stats.total_memory_bytes()
    }
}

impl Display for CountReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "    Total addresses: {}", self.total_lines)?;
        writeln!(f, "Erroneous addresses: {}", self.rejected_lines)?;
        writeln!(f, "   Unique addresses: {}", self.unique)?;
        writeln!(f, "File read time: {} ms", self.read_time.as_millis())?;
        writeln!(f, " Counting time: {} ms", self.counting_time.as_millis())?;
        write!(f, "Memory used: {} bytes", self.memory_bytes())
    }
}

/// Opens `path` and counts the distinct IPv4 addresses in it.
pub fn count_file(path: impl AsRef<Path>, options: &CountOptions) -> Result<CountReport, CountError> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "counting unique IPv4 addresses");

    let file = File::open(path).map_err(|source| CountError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    count_reader(file, options)
}

/// Streams `input` line by line into a fresh [`PrefixTrie`].
///
/// Lines end at `\n`, `\r` or `\r\n`. Lines that are not a dotted-quad IPv4
/// address are counted and logged at WARN, and the run carries on. Only I/O
/// failures abort.
///
/// # Examples
///
/// ```
/// use octet_trie::{count_reader, CountOptions};
/// let input = "1.2.3.4\n1.2.3.4\nnot-an-ip\n1.2.3.5\n";
/// let report = count_reader(input.as_bytes(), &CountOptions::default()).unwrap();
/// assert_eq!(report.total_lines, 4);
/// assert_eq!(report.rejected_lines, 1);
/// assert_eq!(report.unique, 2);
/// ```
pub fn count_reader<R: Read>(input: R, options: &CountOptions) -> Result<CountReport, CountError> {
    let mut reader = BufReader::with_capacity(options.buffer_capacity.max(1), input);
    let mut tally = Tally::new(options);
    let mut chunk = Vec::with_capacity(64);

    let start = Instant::now();
    loop {
        chunk.clear();
        let read = reader
            .read_until(b'\n', &mut chunk)
            .map_err(|source| CountError::Read {
                lines: tally.total_lines,
                source,
            })?;
        if read == 0 {
            break;
        }

        for line in split_lines(&chunk) {
            tally.record(line);
        }
    }
    let Tally {
        trie,
        total_lines,
        rejected_lines,
        ..
    } = tally;
    let read_time = start.elapsed();
    tracing::debug!(?read_time, lines = total_lines, "input consumed");

    let count_start = Instant::now();
    let unique = if options.parallel {
        trie.count_unique()
    } else {
        trie.count_unique_sequential()
    };
    let counting_time = count_start.elapsed();
    tracing::debug!(?counting_time, parallel = options.parallel, "trie reduced");

    let report = CountReport {
        total_lines,
        rejected_lines,
        unique,
        read_time,
        counting_time,
        stats: trie.stats(),
    };
    tracing::info!(
        total = report.total_lines,
        rejected = report.rejected_lines,
        unique = report.unique,
        memory_bytes = report.memory_bytes(),
        "counting finished"
    );
    Ok(report)
}

/// Splits one `read_until(b'\n')` chunk into lines ending at `\n`, `\r` or
/// `\r\n`. The terminator is not part of the yielded line.
fn split_lines(chunk: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = chunk.strip_suffix(b"\n").unwrap_or(chunk);
    let mut pieces: Vec<&[u8]> = body.split(|b| *b == b'\r').collect();
    // A body ending in `\r` leaves an empty tail that belongs to no line.
    if body.ends_with(b"\r") {
        pieces.pop();
    }
    pieces.into_iter()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RejectLog {
    Report,
    /// First line past the limit: say once that logging stops.
    Silence,
    Suppress,
}

fn reject_log(rejected_lines: u64, limit: Option<u64>) -> RejectLog {
    match limit {
        Some(limit) if rejected_lines == limit + 1 => RejectLog::Silence,
        Some(limit) if rejected_lines > limit => RejectLog::Suppress,
        _ => RejectLog::Report,
    }
}

struct Tally<'a> {
    options: &'a CountOptions,
    trie: PrefixTrie,
    total_lines: u64,
    rejected_lines: u64,
}

impl<'a> Tally<'a> {
    fn new(options: &'a CountOptions) -> Self {
        Self {
            options,
            trie: PrefixTrie::new(),
            total_lines: 0,
            rejected_lines: 0,
        }
    }

    fn record(&mut self, line: &[u8]) {
        self.total_lines += 1;
        let interval = self.options.progress_interval;
        if interval != 0 && self.total_lines % interval == 0 {
            tracing::info!(lines = self.total_lines, "progress");
        }

        match parse_line(line) {
            Ok([o0, o1, o2, o3]) => {
                self.trie.insert(o0, o1, o2, o3);
            }
            Err(err) => {
                self.rejected_lines += 1;
                match reject_log(self.rejected_lines, self.options.max_reported_errors) {
                    RejectLog::Report => tracing::warn!(line = self.total_lines, "{err}"),
                    RejectLog::Silence => tracing::warn!(
                        limit = self.options.max_reported_errors,
                        "further rejected lines will not be logged"
                    ),
                    RejectLog::Suppress => {}
                }
            }
        }
    }
}
