//! Connect4 CLI - Command-line interface
//!
//! Commands:
//! - analyze: Score every column of a position
//! - match: Play engine-vs-engine games
//! - benchmark: Measure search speed per depth
//! - config: Print the engine configuration as JSON

mod analyze;
mod benchmark;
mod match_cmd;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use connect4_core::EngineConfig;

#[derive(Parser)]
#[command(name = "connect4")]
#[command(about = "Connect Four engine with minimax alpha-beta search", version)]
struct Cli {
    /// Random seed for reproducible tie-breaks and openings
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Engine configuration JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every column of a position given as a move string
    Analyze(analyze::AnalyzeArgs),
    /// Play a match between two engine depths
    Match(match_cmd::MatchArgs),
    /// Time searches at increasing depths
    Benchmark(benchmark::BenchmarkArgs),
    /// Print the engine configuration as JSON
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let engine = load_engine_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze(args) => analyze::run(args, &engine, cli.seed),
        Commands::Match(args) => match_cmd::run(args, &engine, cli.seed),
        Commands::Benchmark(args) => benchmark::run(args, &engine, cli.seed),
        Commands::Config => {
            let json = serde_json::to_string_pretty(&engine)
                .context("Failed to serialize engine config")?;
            println!("{}", json);
            Ok(())
        }
    }
}

/// Logs go to stderr so JSON output on stdout stays clean
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load engine config: {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}
