//! Benchmark command - search speed per depth
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: create_positions(), run_depth_benchmarks(), report_results()
//! - Level 3: benchmark_depth(), random_position()
//! - Level 4: timing utilities, formatting

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use connect4_core::{random_move, EngineConfig, GameState};

/// Upper bound on random plies used to build benchmark positions
const MAX_RANDOM_PLIES: usize = 10;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Number of random positions searched per depth
    #[arg(long, default_value = "20")]
    pub positions: usize,

    /// Maximum search depth to test
    #[arg(long, default_value = "6")]
    pub depth: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Results for a single depth
#[derive(Clone, Debug)]
struct BenchmarkResult {
    depth: u32,
    positions: usize,
    total_time: Duration,
    avg_time_per_search: Duration,
    nodes: u64,
    cutoffs: u64,
    nodes_per_second: f64,
}

/// All benchmark results
#[derive(Clone, Debug)]
struct AllResults {
    results: Vec<BenchmarkResult>,
    system_info: String,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run benchmark command
///
/// 1. Build a fixed set of random positions
/// 2. Search every position at each depth
/// 3. Report results
pub fn run(args: BenchmarkArgs, engine: &EngineConfig, seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Starting benchmarks: {} positions, max depth {}",
        args.positions,
        args.depth
    );

    let mut rng = create_rng(seed);
    let positions = create_positions(engine, args.positions, &mut rng);

    let results = run_depth_benchmarks(engine, &positions, args.depth, seed)?;
    let all = AllResults {
        results,
        system_info: get_system_info(),
    };

    report_results(&all, &args);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn create_positions(engine: &EngineConfig, count: usize, rng: &mut ChaCha8Rng) -> Vec<GameState> {
    (0..count).map(|_| random_position(engine, rng)).collect()
}

fn run_depth_benchmarks(
    engine: &EngineConfig,
    positions: &[GameState],
    max_depth: u32,
    seed: Option<u64>,
) -> Result<Vec<BenchmarkResult>> {
    let mut results = Vec::new();

    for depth in 1..=max_depth {
        tracing::info!("Benchmarking alpha-beta at depth {}...", depth);
        let mut config = engine.clone();
        config.depth = depth;
        if let Some(seed) = seed {
            config.seed = Some(seed);
        }
        config
            .validate()
            .with_context(|| format!("Cannot benchmark depth {}", depth))?;

        results.push(benchmark_depth(&config, positions));
    }

    Ok(results)
}

fn report_results(results: &AllResults, args: &BenchmarkArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn benchmark_depth(config: &EngineConfig, positions: &[GameState]) -> BenchmarkResult {
    let mut ai = config.build_ai();
    let mut nodes = 0u64;
    let mut cutoffs = 0u64;

    let start = Instant::now();
    for state in positions {
        ai.best_move(state.board(), state.current_player());
        let stats = ai.last_stats();
        nodes += stats.nodes;
        cutoffs += stats.cutoffs;
    }
    let total_time = start.elapsed();

    let searches = positions.len().max(1) as u32;
    let secs = total_time.as_secs_f64();

    BenchmarkResult {
        depth: config.depth,
        positions: positions.len(),
        total_time,
        avg_time_per_search: total_time / searches,
        nodes,
        cutoffs,
        nodes_per_second: if secs > 0.0 { nodes as f64 / secs } else { 0.0 },
    }
}

/// Ongoing position reached by a few random plies
fn random_position(engine: &EngineConfig, rng: &mut ChaCha8Rng) -> GameState {
    let mut state = engine.new_game();
    let plies = rng.gen_range(0..=MAX_RANDOM_PLIES);

    for _ in 0..plies {
        let Some(column) = random_move(state.board(), rng) else {
            break;
        };
        if state.play(column).is_err() {
            break;
        }
        if state.result().is_over() {
            state.undo_last();
            break;
        }
    }

    state
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn get_system_info() -> String {
    format!(
        "connect4 {}, {} CPUs",
        env!("CARGO_PKG_VERSION"),
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)
    )
}

fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 60 {
        format!("{}m {:.1}s", d.as_secs() / 60, (d.as_secs() % 60) as f64 + d.subsec_millis() as f64 / 1000.0)
    } else if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else if d.as_millis() >= 1 {
        format!("{:.1}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.1}us", d.as_secs_f64() * 1_000_000.0)
    }
}

fn print_json_results(results: &AllResults) {
    #[derive(serde::Serialize)]
    struct JsonBenchmark {
        depth: u32,
        positions: usize,
        total_time_ms: f64,
        avg_time_ms: f64,
        nodes: u64,
        cutoffs: u64,
        nodes_per_second: f64,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        system_info: String,
        benchmarks: Vec<JsonBenchmark>,
    }

    let output = JsonOutput {
        system_info: results.system_info.clone(),
        benchmarks: results
            .results
            .iter()
            .map(|r| JsonBenchmark {
                depth: r.depth,
                positions: r.positions,
                total_time_ms: r.total_time.as_secs_f64() * 1000.0,
                avg_time_ms: r.avg_time_per_search.as_secs_f64() * 1000.0,
                nodes: r.nodes,
                cutoffs: r.cutoffs,
                nodes_per_second: r.nodes_per_second,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_results(results: &AllResults) {
    println!("\n=== Connect4 Benchmark Results ===");
    println!("System: {}\n", results.system_info);

    println!(
        "{:<6} {:>9} {:>12} {:>12} {:>12} {:>10} {:>12}",
        "Depth", "Positions", "Total Time", "Avg/Search", "Nodes", "Cutoffs", "Nodes/s"
    );
    println!("{}", "-".repeat(80));

    for r in &results.results {
        println!(
            "{:<6} {:>9} {:>12} {:>12} {:>12} {:>10} {:>12.0}",
            r.depth,
            r.positions,
            format_duration(r.total_time),
            format_duration(r.avg_time_per_search),
            r.nodes,
            r.cutoffs,
            r.nodes_per_second
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
