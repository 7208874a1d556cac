use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, ValueHint};
use gpx_edit::{build_intervals, edit_gpx, parse_timestamp, read_gpx, write_gpx};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "GPX track timeline editor", long_about = None)]
struct Cli {
    /// Input GPX file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output GPX file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Discard all points before this timestamp (YYYY-MM-DD HH:MM:SS, UTC)
    #[arg(short = 'b', long, value_parser = parse_timestamp)]
    remove_before: Option<DateTime<Utc>>,

    /// Start of a time span to cut out (repeatable, pairs with --adjustment-end)
    #[arg(short = 's', long, value_parser = parse_timestamp, action = ArgAction::Append)]
    adjustment_start: Vec<DateTime<Utc>>,

    /// End of a time span to cut out (repeatable)
    #[arg(short = 'e', long, value_parser = parse_timestamp, action = ArgAction::Append)]
    adjustment_end: Vec<DateTime<Utc>>,

    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    // Validation runs to completion before any track is touched; on failure
    // the specific rejection is reported and no output file is written.
    let intervals = build_intervals(cli.adjustment_start, cli.adjustment_end)?;
    for interval in &intervals {
        debug!("Cutting {} ({}s)", interval, interval.duration().num_seconds());
    }
    if let Some(cutoff) = cli.remove_before {
        debug!("Discarding points before {}", cutoff.format("%Y-%m-%d %H:%M:%S"));
    }

    let data = fs::read(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let mut gpx = read_gpx(&data)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;

    let report = edit_gpx(&mut gpx, cli.remove_before, &intervals)?;
    info!(
        "Edited timeline: {} dropped before cutoff, {} removed in adjustments, {} shifted, {} synthesized",
        report.dropped_before_cutoff,
        report.removed_in_intervals,
        report.shifted,
        report.synthesized
    );

    let encoded = write_gpx(&gpx)?;
    fs::write(&cli.output, encoded)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!("Wrote edited GPX: {}", cli.output.display());
    Ok(())
}
