//! Game runner - executes single engine-vs-engine games

use connect4_core::{random_move, EngineConfig, GameResult, GameState, Player};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Outcome of a single game
#[derive(Clone, Debug, Serialize)]
pub struct GameOutcome {
    /// Final game result
    pub result: GameResult,
    /// Columns played, including the random opening
    pub moves: Vec<usize>,
    /// How many of `moves` were random opening plies
    pub opening_plies: usize,
}

impl GameOutcome {
    pub fn red_wins(&self) -> bool {
        self.result == GameResult::Win(Player::Red)
    }

    pub fn yellow_wins(&self) -> bool {
        self.result == GameResult::Win(Player::Yellow)
    }

    /// Board filled with no winner, or the game stopped early
    pub fn is_draw(&self) -> bool {
        self.result.winner().is_none()
    }

    pub fn winner(&self) -> Option<Player> {
        self.result.winner()
    }

    pub fn plies(&self) -> usize {
        self.moves.len()
    }
}

/// Plays games between a Red and a Yellow engine
pub struct GameRunner {
    red: EngineConfig,
    yellow: EngineConfig,
    random_openings: usize,
}

impl GameRunner {
    pub fn new(red: EngineConfig, yellow: EngineConfig) -> Self {
        Self {
            red,
            yellow,
            random_openings: 0,
        }
    }

    pub fn with_random_openings(mut self, plies: usize) -> Self {
        self.random_openings = plies;
        self
    }

    /// Play one game. `seed` drives the opening and both engines' tie-breaks.
    pub fn play_game(&self, seed: u64) -> GameOutcome {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = self.red.new_game();
        let opening_plies = self.play_opening(&mut state, &mut rng);

        let mut red_ai = self.red.clone().with_seed(seed).build_ai();
        let mut yellow_ai = self.yellow.clone().with_seed(seed.wrapping_add(1)).build_ai();

        while !state.result().is_over() {
            let player = state.current_player();
            let ai = match player {
                Player::Red => &mut red_ai,
                Player::Yellow => &mut yellow_ai,
            };

            let Some(column) = ai.best_move(state.board(), player).column else {
                break;
            };
            if let Err(e) = state.play(column) {
                tracing::warn!("{} engine proposed column {}: {}", player.name(), column, e);
                break;
            }
        }

        GameOutcome {
            result: state.result(),
            moves: state.history().to_vec(),
            opening_plies,
        }
    }

    /// Random legal moves that do not end the game
    fn play_opening(&self, state: &mut GameState, rng: &mut ChaCha8Rng) -> usize {
        for ply in 0..self.random_openings {
            let Some(column) = random_move(state.board(), rng) else {
                return ply;
            };
            if state.play(column).is_err() {
                return ply;
            }
            if state.result().is_over() {
                state.undo_last();
                return ply;
            }
        }
        self.random_openings
    }
}
