use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use env_logger::Builder;

use sed_distance_calculator::output::{self, SedValue};
use sed_distance_calculator::sequence_reader;
use sed_distance_calculator::{build_report, try_distance, try_normalized_distance, Strategy};

/// Edit distance between two integer sequences read as whitespace-separated
/// tokens, the first ending at a `-1`.
#[derive(Debug, Parser)]
#[command(name = "calculate_sed", version)]
struct Cli {
    /// Read tokens from this file instead of stdin
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Input is gzip-compressed (implied for `.gz` files)
    #[arg(long)]
    gzip: bool,

    /// Print the normalized distance
    #[arg(short, long)]
    normalized: bool,

    #[arg(short, long, value_enum, default_value_t = Strategy::FullTable)]
    strategy: Strategy,

    /// Print a JSON report with both distances
    #[arg(long, conflicts_with = "normalized")]
    json: bool,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let reader = sequence_reader::open_input(cli.input.as_deref(), cli.gzip)
        .context("Opening input")?;
    let pair = sequence_reader::read_sequence_pair(reader).context("Reading sequences")?;
    log::info!(
        "computing SED of {} and {} tokens",
        pair.first.len(),
        pair.second.len()
    );

    let stdout = io::stdout().lock();
    if cli.json {
        let report = build_report(&pair, cli.strategy).context("Computing edit distance")?;
        output::write_report_json(stdout, &report).context("Writing report")?;
        return Ok(());
    }

    let value = if cli.normalized {
        SedValue::Normalized(
            try_normalized_distance(&pair.first, &pair.second, cli.strategy)
                .context("Computing normalized edit distance")?,
        )
    } else {
        SedValue::Raw(
            try_distance(&pair.first, &pair.second, cli.strategy)
                .context("Computing edit distance")?,
        )
    };
    output::write_value(stdout, &value).context("Writing result")
}
