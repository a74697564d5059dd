use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use drum_analyzer::{init_logging, AppConfig, SampleAnalyzer};

#[derive(Parser, Debug)]
#[command(
    name = "drum_analyzer",
    about = "Classify drum samples as Kick, Snare or Hi-Hat"
)]
struct Cli {
    /// Sample file, or folder of samples in batch mode
    path: PathBuf,
    /// Print results as pretty JSON
    #[arg(long)]
    json: bool,
    /// Analyze every sample in PATH (implied when PATH is a directory)
    #[arg(long)]
    batch: bool,
    /// Analyzer configuration file (defaults to $DRUM_ANALYZER_CONFIG or
    /// assets/analyzer_config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of files analyzed in parallel in batch mode
    #[arg(long)]
    jobs: Option<usize>,
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };
    if let Some(jobs) = cli.jobs {
        config.batch.jobs = jobs;
    }

    let analyzer = SampleAnalyzer::new(config).context("invalid analyzer configuration")?;
    if cli.batch || cli.path.is_dir() {
        run_batch(&analyzer, &cli.path, cli.json)
    } else {
        run_single(&analyzer, &cli.path, cli.json)
    }
}

fn run_single(analyzer: &SampleAnalyzer, path: &Path, json: bool) -> Result<ExitCode> {
    let result = analyzer.analyze_one(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.summary());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_batch(analyzer: &SampleAnalyzer, folder: &Path, json: bool) -> Result<ExitCode> {
    let entries = analyzer.analyze_many(folder)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("  {}", entry.summary());
        }
    }
    Ok(ExitCode::SUCCESS)
}
