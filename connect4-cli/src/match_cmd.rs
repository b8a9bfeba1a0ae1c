//! Match command - play games between two engine depths
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_match_config(), play(), report_results()
//! - Level 3: game records
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;

use connect4_core::{EngineConfig, GameResult, Player};
use connect4_match::{play_match, MatchConfig, MatchResult};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play (will alternate colors)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Search depth of the first engine
    #[arg(long, default_value = "4")]
    pub first_depth: u32,

    /// Search depth of the second engine
    #[arg(long, default_value = "4")]
    pub second_depth: u32,

    /// Random plies at the start of each game
    #[arg(long, default_value = "2")]
    pub random_openings: usize,

    /// Play games one at a time instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Build both engines from the shared config
/// 2. Play the match
/// 3. Report results
pub fn run(args: MatchArgs, engine: &EngineConfig, seed: Option<u64>) -> Result<()> {
    let config = build_match_config(&args, engine, seed);

    tracing::info!(
        "Starting match: depth {} vs depth {} ({} games)",
        args.first_depth,
        args.second_depth,
        args.games
    );

    let result = play(&config)?;
    report_results(&result, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_match_config(args: &MatchArgs, engine: &EngineConfig, seed: Option<u64>) -> MatchConfig {
    let mut first = engine.clone();
    first.depth = args.first_depth;
    let mut second = engine.clone();
    second.depth = args.second_depth;

    let mut config = MatchConfig {
        first,
        second,
        games: args.games,
        random_openings: args.random_openings,
        parallel: !args.sequential,
        seed: None,
    };
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    config
}

fn play(config: &MatchConfig) -> Result<MatchResult> {
    play_match(config).context("Invalid match settings")
}

fn report_results(result: &MatchResult, args: &MatchArgs) {
    if args.json {
        print_json_results(result, args);
    } else {
        print_text_results(result, args);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Which engine won game `index`, given that the first engine is Red in
/// even-numbered games
fn winner_label(result: GameResult, index: usize) -> &'static str {
    let first_is_red = index % 2 == 0;
    match result.winner() {
        Some(winner) if (winner == Player::Red) == first_is_red => "first",
        Some(_) => "second",
        None => "draw",
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(rate: f32) -> f32 {
    rate * 100.0
}

fn print_json_results(result: &MatchResult, args: &MatchArgs) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        winner: &'static str,
        result: GameResult,
        plies: usize,
        moves: String,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        first_depth: u32,
        second_depth: u32,
        #[serde(flatten)]
        summary: &'a MatchResult,
        first_win_rate: f32,
        first_score: f32,
        second_score: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        first_depth: args.first_depth,
        second_depth: args.second_depth,
        summary: result,
        first_win_rate: result.first_win_rate(),
        first_score: result.score_for_first(),
        second_score: result.score_for_second(),
        games: result
            .game_outcomes
            .iter()
            .enumerate()
            .map(|(i, o)| JsonGame {
                game_number: i + 1,
                winner: winner_label(o.result, i),
                result: o.result,
                plies: o.plies(),
                moves: o.moves.iter().map(|c| (c + 1).to_string()).collect(),
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_results(result: &MatchResult, args: &MatchArgs) {
    println!("\n=== Match Results ===");
    println!("Total games:  {}", result.games_played);
    println!(
        "First (d{}):  {} wins ({:.1}%)",
        args.first_depth,
        result.first_wins,
        percent(result.first_win_rate())
    );
    println!(
        "Second (d{}): {} wins ({:.1}%)",
        args.second_depth,
        result.second_wins,
        percent(result.second_win_rate())
    );
    println!("Draws:        {} ({:.1}%)", result.draws, percent(result.draw_rate()));
    println!("Avg plies:    {:.1}", result.avg_plies);
    println!(
        "Score:        {:.1} - {:.1}",
        result.score_for_first(),
        result.score_for_second()
    );

    println!("\nGame details:");
    for (i, game) in result.game_outcomes.iter().enumerate() {
        println!(
            "  Game {}: {} ({:?}) in {} plies",
            i + 1,
            winner_label(game.result, i),
            game.result,
            game.plies()
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(games: usize) -> MatchArgs {
        MatchArgs {
            games,
            first_depth: 1,
            second_depth: 3,
            random_openings: 2,
            sequential: true,
            json: false,
        }
    }

    #[test]
    fn test_build_match_config() {
        let config = build_match_config(&args(4), &EngineConfig::default(), Some(5));
        assert_eq!(config.first.depth, 1);
        assert_eq!(config.second.depth, 3);
        assert_eq!(config.games, 4);
        assert_eq!(config.seed, Some(5));
        assert!(!config.parallel);
    }

    #[test]
    fn test_play_small_match() {
        let config = build_match_config(&args(2), &EngineConfig::default(), Some(1));
        let result = play(&config).unwrap();
        assert_eq!(result.games_played, 2);
        assert_eq!(result.first_wins + result.second_wins + result.draws, 2);
    }

    #[test]
    fn test_invalid_engine_is_reported() {
        let mut engine = EngineConfig::default();
        engine.win_score = 1;
        let config = build_match_config(&args(2), &engine, None);
        assert!(play(&config).is_err());
    }

    #[test]
    fn test_winner_label_follows_color_alternation() {
        let red = GameResult::Win(Player::Red);
        assert_eq!(winner_label(red, 0), "first");
        assert_eq!(winner_label(red, 1), "second");
        assert_eq!(winner_label(GameResult::Win(Player::Yellow), 1), "first");
        assert_eq!(winner_label(GameResult::Draw, 0), "draw");
    }
}
