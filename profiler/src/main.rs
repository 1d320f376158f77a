use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use sweeper_core::{CSV_HEADER, GameConfig, ProfileReport, ShuffleGenerator, run_profile};

/// Generates boards in bulk and reports how often the verifier can solve them.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board width in tiles
    #[arg(long, default_value_t = 32)]
    width: u8,

    /// Board height in tiles
    #[arg(long, default_value_t = 32)]
    height: u8,

    /// Difficulty index, 0 (easy) to 2 (hard)
    #[arg(short, long, default_value_t = 0)]
    difficulty: u8,

    /// Number of boards to generate
    #[arg(short = 'n', long, default_value_t = 30000, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Skip the solvability gate and measure the raw solve rate
    #[arg(long)]
    no_solvable: bool,

    /// Append the CSV row to this file, writing the header if the file is new
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the report as JSON instead of CSV
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    config: &'a GameConfig,
    #[serde(flatten)]
    report: &'a ProfileReport,
    success_rate: f64,
    total_ms: f64,
    average_ms: f64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = GameConfig::new(args.width, args.height, args.difficulty)
        .context("Invalid board configuration")?
        .with_solvable(!args.no_solvable);

    let rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    log::info!(
        "Profiling {} boards of {}x{} at difficulty {} (solvable: {}, seed: {:?})",
        args.iterations,
        config.width,
        config.height,
        config.difficulty,
        config.ensure_solvable,
        args.seed
    );

    let mut generator = ShuffleGenerator::new(rng);
    let report =
        run_profile(&config, args.iterations, &mut generator).context("Profiling failed")?;
    log::info!(
        "{} of {} boards solvable, {} candidates drawn",
        report.successes,
        report.iterations,
        report.attempts
    );

    if args.json {
        let json = JsonReport {
            config: &config,
            report: &report,
            success_rate: report.success_rate(),
            total_ms: report.total_ms(),
            average_ms: report.average_ms(),
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{CSV_HEADER}");
        println!("{report}");
    }

    if let Some(path) = &args.output {
        append_csv(path, &report)
            .with_context(|| format!("Could not write report to {}", path.display()))?;
    }

    Ok(())
}

fn append_csv(path: &Path, report: &ProfileReport) -> anyhow::Result<()> {
    let is_new = fs::metadata(path).map_or(true, |meta| meta.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    if is_new {
        writeln!(file, "{CSV_HEADER}")?;
    }
    writeln!(file, "{report}")?;
    Ok(())
}
