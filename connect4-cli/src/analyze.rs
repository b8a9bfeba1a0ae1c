//! Analyze command - score every column of a position
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), load_position(), analyze_position(), report()
//! - Level 3: render_board()
//! - Level 4: formatting utilities

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;

use connect4_core::{
    Board, Cell, ColumnScore, EngineConfig, GameResult, GameState, Player, SearchResult,
    SearchStats,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Moves played so far as 1-based column digits, e.g. 4453
    #[arg(long, default_value = "")]
    pub moves: String,

    /// Search depth (overrides the engine config)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Everything learned about one position
#[derive(Clone, Debug)]
struct Analysis {
    state: GameState,
    depth: u32,
    scores: Vec<ColumnScore>,
    best: SearchResult,
    stats: SearchStats,
    elapsed: Duration,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run analyze command
///
/// 1. Apply CLI overrides to the engine config
/// 2. Replay the move string
/// 3. Score each column and pick the best move
/// 4. Report
pub fn run(args: AnalyzeArgs, engine: &EngineConfig, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, engine, seed)?;
    let state = load_position(&args.moves, &config)?;

    tracing::info!(
        "Analyzing '{}' at depth {} ({} to move)",
        state.move_string(),
        config.depth,
        state.current_player().name()
    );

    let analysis = analyze_position(&config, state);
    report(&analysis, args.json);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_config(args: &AnalyzeArgs, engine: &EngineConfig, seed: Option<u64>) -> Result<EngineConfig> {
    let mut config = engine.clone();
    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    if let Some(seed) = seed {
        config.seed = Some(seed);
    }
    config.validate().context("Invalid engine settings")?;
    Ok(config)
}

fn load_position(moves: &str, config: &EngineConfig) -> Result<GameState> {
    GameState::from_moves(config.rows, config.cols, moves)
        .with_context(|| format!("Failed to replay moves '{}'", moves))
}

fn analyze_position(config: &EngineConfig, state: GameState) -> Analysis {
    let player = state.current_player();
    let mut ai = config.build_ai();
    let start = Instant::now();

    let (scores, best, stats) = if state.result().is_over() {
        let best = ai.search(state.board(), 0, player);
        (Vec::new(), best, ai.last_stats())
    } else {
        let scores = ai.analyze(state.board(), player);
        let stats = ai.last_stats();
        let best = pick_best(&scores);
        (scores, best, stats)
    };

    Analysis {
        state,
        depth: config.depth,
        scores,
        best,
        stats,
        elapsed: start.elapsed(),
    }
}

fn report(analysis: &Analysis, json: bool) {
    if json {
        print_json_results(analysis);
    } else {
        print_text_results(analysis);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Highest score wins; the leftmost column breaks ties
fn pick_best(scores: &[ColumnScore]) -> SearchResult {
    scores
        .iter()
        .fold(None, |best: Option<ColumnScore>, cs| match best {
            Some(b) if b.score >= cs.score => Some(b),
            _ => Some(*cs),
        })
        .map(|cs| SearchResult {
            column: Some(cs.column),
            score: cs.score,
        })
        .unwrap_or(SearchResult::no_move(0))
}

/// Top row first, columns numbered from 1
fn render_board(board: &Board) -> String {
    let mut out = String::new();
    for r in 0..board.rows() {
        let line: Vec<&str> = board.row(r).iter().map(|&cell| cell_symbol(cell)).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    let footer: Vec<String> = (1..=board.cols()).map(|c| (c % 10).to_string()).collect();
    out.push_str(&footer.join(" "));
    out
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn cell_symbol(cell: Cell) -> &'static str {
    match cell {
        Cell::Empty => ".",
        Cell::Red => "R",
        Cell::Yellow => "Y",
    }
}

fn describe_result(result: GameResult) -> String {
    match result {
        GameResult::Ongoing => "ongoing".to_string(),
        GameResult::Win(player) => format!("{} wins", player.name()),
        GameResult::Draw => "draw".to_string(),
    }
}

fn print_json_results(analysis: &Analysis) {
    #[derive(serde::Serialize)]
    struct JsonColumn {
        /// 1-based, matching the move string
        column: usize,
        score: i32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        moves: String,
        to_move: Player,
        result: GameResult,
        depth: u32,
        best_column: Option<usize>,
        best_score: i32,
        columns: Vec<JsonColumn>,
        stats: SearchStats,
        elapsed_ms: f64,
    }

    let output = JsonOutput {
        moves: analysis.state.move_string(),
        to_move: analysis.state.current_player(),
        result: analysis.state.result(),
        depth: analysis.depth,
        best_column: analysis.best.column.map(|c| c + 1),
        best_score: analysis.best.score,
        columns: analysis
            .scores
            .iter()
            .map(|cs| JsonColumn {
                column: cs.column + 1,
                score: cs.score,
            })
            .collect(),
        stats: analysis.stats,
        elapsed_ms: analysis.elapsed.as_secs_f64() * 1000.0,
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_results(analysis: &Analysis) {
    let state = &analysis.state;

    println!("\n{}\n", render_board(state.board()));
    println!("Moves:    {}", if state.history().is_empty() { "-".to_string() } else { state.move_string() });

    let result = state.result();
    if result.is_over() {
        println!("Result:   {} (score {})", describe_result(result), analysis.best.score);
        return;
    }

    println!("To move:  {}", state.current_player().name());
    println!("Depth:    {}", analysis.depth);
    println!("\nColumn scores:");
    for cs in &analysis.scores {
        let marker = if analysis.best.column == Some(cs.column) { " <- best" } else { "" };
        println!("  {:>2}: {:>9}{}", cs.column + 1, cs.score, marker);
    }

    println!(
        "\n{} nodes, {} cutoffs in {:.1}ms{}",
        analysis.stats.nodes,
        analysis.stats.cutoffs,
        analysis.elapsed.as_secs_f64() * 1000.0,
        if analysis.stats.budget_exhausted { " (budget exhausted)" } else { "" }
    );
}

// ============================================================================
// TESTS
// ============================================================================
