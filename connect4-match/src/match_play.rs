//! Match play - multiple games between two engine configurations
//!
//! Level 2 - Phase-level implementation

use connect4_core::{ConfigError, Player};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::MatchConfig;
use crate::game_runner::{GameOutcome, GameRunner};

/// Result of a match (multiple games)
#[derive(Clone, Debug, Serialize)]
pub struct MatchResult {
    /// Wins for the first engine
    pub first_wins: u32,
    /// Wins for the second engine
    pub second_wins: u32,
    /// Games that ended without a winner
    pub draws: u32,
    /// Average game length in plies
    pub avg_plies: f32,
    /// Total games played
    pub games_played: u32,
    /// Individual game outcomes
    #[serde(skip)]
    pub game_outcomes: Vec<GameOutcome>,
}

impl MatchResult {
    pub fn empty() -> Self {
        Self {
            first_wins: 0,
            second_wins: 0,
            draws: 0,
            avg_plies: 0.0,
            games_played: 0,
            game_outcomes: Vec::new(),
        }
    }

    fn rate(&self, count: u32) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            count as f32 / self.games_played as f32
        }
    }

    pub fn first_win_rate(&self) -> f32 {
        self.rate(self.first_wins)
    }

    pub fn second_win_rate(&self) -> f32 {
        self.rate(self.second_wins)
    }

    pub fn draw_rate(&self) -> f32 {
        self.rate(self.draws)
    }

    /// Wins = 1.0, Draws = 0.5, Losses = 0.0
    pub fn score_for_first(&self) -> f32 {
        self.first_wins as f32 + 0.5 * self.draws as f32
    }

    pub fn score_for_second(&self) -> f32 {
        self.second_wins as f32 + 0.5 * self.draws as f32
    }
}

/// Play a match between two engines (Level 2 phase)
///
/// Colors alternate every game; the first engine plays Red in game 0.
pub fn play_match(config: &MatchConfig) -> Result<MatchResult, ConfigError> {
    config.validate()?;
    if config.games == 0 {
        return Ok(MatchResult::empty());
    }

    tracing::info!(
        "Match: depth {} vs depth {}, {} games, {} random opening plies",
        config.first.depth,
        config.second.depth,
        config.games,
        config.random_openings
    );

    let game_configs = prepare_game_configs(config.games);
    let results = if config.parallel {
        execute_games_parallel(config, &game_configs)
    } else {
        execute_games(config, &game_configs)
    };
    Ok(aggregate_results(results))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Configuration for a single game in a match
#[derive(Clone, Copy)]
struct GameConfig {
    /// Whether the first engine plays Red this game
    first_is_red: bool,
    /// Game index (for seeding)
    game_index: usize,
}

fn prepare_game_configs(games: usize) -> Vec<GameConfig> {
    (0..games)
        .map(|i| GameConfig {
            first_is_red: i % 2 == 0,
            game_index: i,
        })
        .collect()
}

fn execute_games(config: &MatchConfig, game_configs: &[GameConfig]) -> Vec<GameOutcomeWithContext> {
    let base_seed = config.base_seed();

    game_configs
        .iter()
        .map(|gc| play_single_game(config, gc, base_seed.wrapping_add(gc.game_index as u64)))
        .collect()
}

/// Execute games in parallel using rayon
fn execute_games_parallel(
    config: &MatchConfig,
    game_configs: &[GameConfig],
) -> Vec<GameOutcomeWithContext> {
    let base_seed = config.base_seed();

    game_configs
        .par_iter()
        .map(|gc| play_single_game(config, gc, base_seed.wrapping_add(gc.game_index as u64)))
        .collect()
}

/// Outcome plus which engine had Red
#[derive(Clone)]
struct GameOutcomeWithContext {
    outcome: GameOutcome,
    first_was_red: bool,
}

fn play_single_game(config: &MatchConfig, gc: &GameConfig, seed: u64) -> GameOutcomeWithContext {
    let (red, yellow) = if gc.first_is_red {
        (config.first.clone(), config.second.clone())
    } else {
        (config.second.clone(), config.first.clone())
    };

    let runner = GameRunner::new(red, yellow).with_random_openings(config.random_openings);
    let outcome = runner.play_game(seed);

    tracing::info!(
        "Game {}: {:?} in {} plies",
        gc.game_index + 1,
        outcome.result,
        outcome.plies()
    );

    GameOutcomeWithContext {
        outcome,
        first_was_red: gc.first_is_red,
    }
}

fn aggregate_results(outcomes: Vec<GameOutcomeWithContext>) -> MatchResult {
    let mut first_wins = 0u32;
    let mut second_wins = 0u32;
    let mut draws = 0u32;
    let mut total_plies = 0usize;
    let mut game_outcomes = Vec::with_capacity(outcomes.len());

    for owc in outcomes {
        total_plies += owc.outcome.plies();

        match owc.outcome.winner() {
            Some(winner) => {
                let first_won = (winner == Player::Red) == owc.first_was_red;
                if first_won {
                    first_wins += 1;
                } else {
                    second_wins += 1;
                }
            }
            None => draws += 1,
        }

        game_outcomes.push(owc.outcome);
    }

    let games_played = game_outcomes.len() as u32;
    let avg_plies = if games_played > 0 {
        total_plies as f32 / games_played as f32
    } else {
        0.0
    };

    MatchResult {
        first_wins,
        second_wins,
        draws,
        avg_plies,
        games_played,
        game_outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect4_core::GameResult;

    fn outcome(result: GameResult, plies: usize) -> GameOutcome {
        GameOutcome {
            result,
            moves: vec![0; plies],
            opening_plies: 0,
        }
    }

    #[test]
    fn test_match_result_empty() {
        let result = MatchResult::empty();
        assert_eq!(result.games_played, 0);
        assert_eq!(result.first_win_rate(), 0.0);
    }

    #[test]
    fn test_match_result_rates_and_scores() {
        let result = MatchResult {
            first_wins: 6,
            second_wins: 3,
            draws: 1,
            avg_plies: 25.0,
            games_played: 10,
            game_outcomes: vec![],
        };

        assert_eq!(result.first_win_rate(), 0.6);
        assert_eq!(result.second_win_rate(), 0.3);
        assert_eq!(result.draw_rate(), 0.1);
        assert_eq!(result.score_for_first(), 6.5);
        assert_eq!(result.score_for_second(), 3.5);
    }

    #[test]
    fn test_aggregate_attributes_wins_by_color() {
        let outcomes = vec![
            GameOutcomeWithContext {
                outcome: outcome(GameResult::Win(Player::Red), 10),
                first_was_red: true,
            },
            GameOutcomeWithContext {
                outcome: outcome(GameResult::Win(Player::Red), 20),
                first_was_red: false,
            },
            GameOutcomeWithContext {
                outcome: outcome(GameResult::Win(Player::Yellow), 12),
                first_was_red: false,
            },
            GameOutcomeWithContext {
                outcome: outcome(GameResult::Draw, 42),
                first_was_red: true,
            },
        ];

        let result = aggregate_results(outcomes);
        assert_eq!(result.first_wins, 2);
        assert_eq!(result.second_wins, 1);
        assert_eq!(result.draws, 1);
        assert_eq!(result.games_played, 4);
        assert!((result.avg_plies - 21.0).abs() < 0.01);
    }

    #[test]
    fn test_prepare_game_configs() {
        let configs = prepare_game_configs(4);
        assert_eq!(configs.len(), 4);
        assert!(configs[0].first_is_red);
        assert!(!configs[1].first_is_red);
        assert!(configs[2].first_is_red);
        assert!(!configs[3].first_is_red);
        assert_eq!(configs[3].game_index, 3);
    }

    #[test]
    fn test_play_match_basic() {
        let config = MatchConfig::alpha_beta(1, 2).with_games(2).with_seed(42);
        let result = play_match(&config).unwrap();

        assert_eq!(result.games_played, 2);
        assert_eq!(result.first_wins + result.second_wins + result.draws, 2);
        assert_eq!(result.game_outcomes.len(), 2);
    }

    #[test]
    fn test_play_match_zero_games() {
        let config = MatchConfig::alpha_beta(1, 1).with_games(0);
        let result = play_match(&config).unwrap();
        assert_eq!(result.games_played, 0);
    }

    #[test]
    fn test_play_match_rejects_invalid_config() {
        let mut config = MatchConfig::alpha_beta(1, 1).with_games(2);
        config.first.rows = 5;
        assert!(play_match(&config).is_err());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = MatchConfig::alpha_beta(2, 2).with_games(4).with_seed(9);
        let parallel = play_match(&config).unwrap();
        let sequential = play_match(&config.clone().sequential()).unwrap();

        let moves = |r: &MatchResult| -> Vec<Vec<usize>> {
            r.game_outcomes.iter().map(|o| o.moves.clone()).collect()
        };
        assert_eq!(moves(&parallel), moves(&sequential));
        assert_eq!(parallel.first_wins, sequential.first_wins);
    }
}
