use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap::ValueEnum;
use octet_trie::{count_file, count_reader, CountOptions, CountReport};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

/// Counts distinct IPv4 addresses in a line-delimited file.
#[derive(Debug, Parser)]
#[clap(name = "octet-count", version)]
struct Args {
    /// File with one address per line, `-` reads stdin.
    #[clap(value_name = "INPUT")]
    input: PathBuf,

    /// Reduce the trie on a single thread.
    #[clap(long, env = "OCTET_COUNT_SEQUENTIAL")]
    sequential: bool,

    /// Log progress every N lines, 0 turns it off.
    #[clap(long, env = "OCTET_COUNT_PROGRESS_INTERVAL", default_value_t = 1_000_000)]
    progress_interval: u64,

    /// Read buffer size in bytes.
    #[clap(long, env = "OCTET_COUNT_BUFFER_SIZE", default_value_t = 32 * 1024 * 1024)]
    buffer_size: usize,

    /// Stop logging rejected lines after N of them.
    #[clap(long, env = "OCTET_COUNT_MAX_REPORTED_ERRORS")]
    max_reported_errors: Option<u64>,

    #[clap(long, env = "OCTET_COUNT_LOG_FORMAT", value_enum, default_value = "pretty")]
    log_format: LogOutputFormat,

    /// Print per-level trie statistics.
    #[clap(long)]
    stats: bool,

    /// Print the full report as JSON instead of the plain count.
    #[cfg(feature = "stats")]
    #[clap(long)]
    json: bool,
}

impl Args {
    fn options(&self) -> CountOptions {
        CountOptions::default()
            .with_parallel(!self.sequential)
            .with_progress_interval(self.progress_interval)
            .with_buffer_capacity(self.buffer_size)
            .with_max_reported_errors(self.max_reported_errors)
    }
}

fn run(args: &Args) -> anyhow::Result<CountReport> {
    let options = args.options();
    let report = if args.input.as_os_str() == "-" {
        tracing::info!("counting unique IPv4 addresses from stdin");
        count_reader(std::io::stdin().lock(), &options)?
    } else {
        count_file(&args.input, &options)?
    };
    Ok(report)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let pretty = matches!(args.log_format, LogOutputFormat::Pretty);
    octet_trie::logging::setup_logging("info", pretty);

    let report = run(&args).with_context(|| format!("counting {}", args.input.display()))?;

    for line in report.to_string().lines() {
        tracing::info!("{line}");
    }
    if args.stats {
        eprint!("{}", report.stats);
    }

    emit(&args, &report)
}

#[cfg(feature = "stats")]
fn emit(args: &Args, report: &CountReport) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report.unique);
    }
    Ok(())
}

#[cfg(not(feature = "stats"))]
fn emit(_args: &Args, report: &CountReport) -> anyhow::Result<()> {
    println!("{}", report.unique);
    Ok(())
}
