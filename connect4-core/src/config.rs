//! Engine configuration, loadable from JSON

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::{AlphaBetaAI, SearchBudget, DEFAULT_DEPTH, WIN_SCORE};
use crate::board::{COLS, ROWS};
use crate::error::ConfigError;
use crate::eval::Heuristics;
use crate::game::GameState;

/// Board size, search settings, and evaluation weights
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    /// Plies of lookahead
    pub depth: u32,
    /// Score of a won position
    pub win_score: i32,
    /// Random initial column at every search node
    pub randomize_ties: bool,
    /// RNG seed for tie-breaks (None = fixed default seed)
    pub seed: Option<u64>,
    /// Maximum nodes per search
    pub node_limit: Option<u64>,
    /// Maximum wall time per search in milliseconds
    pub time_limit_ms: Option<u64>,
    pub heuristics: Heuristics,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: ROWS,
            cols: COLS,
            depth: DEFAULT_DEPTH,
            win_score: WIN_SCORE,
            randomize_ties: true,
            seed: None,
            node_limit: None,
            time_limit_ms: None,
            heuristics: Heuristics::default(),
        }
    }
}

impl EngineConfig {
    /// Default config searching `depth` plies
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::Validation(
                "rows and cols must be > 0".into(),
            ));
        }

        let cells = self.rows * self.cols;
        if self.depth as usize > cells {
            return Err(ConfigError::Validation(format!(
                "depth must be <= {} (cells on the board)",
                cells
            )));
        }

        let bound = self.heuristics.max_magnitude(self.rows, self.cols);
        if self.win_score <= 0 || self.win_score as i64 <= bound {
            return Err(ConfigError::Validation(format!(
                "win_score must exceed the largest heuristic score ({})",
                bound
            )));
        }

        if self.node_limit == Some(0) {
            return Err(ConfigError::Validation(
                "node_limit must be > 0".into(),
            ));
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::Validation(
                "time_limit_ms must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// New game of the configured size, Red to move
    pub fn new_game(&self) -> GameState {
        GameState::new(self.rows, self.cols)
    }

    pub fn budget(&self) -> SearchBudget {
        SearchBudget {
            node_limit: self.node_limit,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }

    /// Build an AI with these settings
    pub fn build_ai(&self) -> AlphaBetaAI {
        let mut ai = match self.seed {
            Some(seed) => AlphaBetaAI::with_seed(self.depth, self.heuristics.clone(), seed),
            None => AlphaBetaAI::new(self.depth, self.heuristics.clone()),
        }
        .with_budget(self.budget());
        if let Err(e) = ai.set_win_score(self.win_score) {
            tracing::warn!("{}; keeping win_score {}", e, ai.win_score());
        }
        ai.randomize_ties = self.randomize_ties;
        ai
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.rows, 6);
        assert_eq!(config.cols, 7);
        assert_eq!(config.depth, 6);
        assert_eq!(config.win_score, 9_999_999);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "depth": 3, "heuristics": { "three": 7 } }"#).unwrap();
        assert_eq!(config.depth, 3);
        assert_eq!(config.heuristics.three, 7);
        assert_eq!(config.heuristics.opponent_three, -4);
        assert_eq!(config.cols, COLS);
    }

    #[test]
    fn test_validation_rejects_zero_size() {
        let mut config = EngineConfig::default();
        config.cols = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_excess_depth() {
        let mut config = EngineConfig::default();
        config.depth = 43;
        assert!(config.validate().is_err());
        config.depth = 42;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_small_win_score() {
        let mut config = EngineConfig::default();
        config.win_score = 1000;
        assert!(config.validate().is_err());
        config.win_score = -5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_budgets() {
        let mut config = EngineConfig::default();
        config.node_limit = Some(0);
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.time_limit_ms = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, r#"{{ "depth": 4, "seed": 9, "node_limit": 5000 }}"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.depth, 4);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.budget().node_limit, Some(5000));
        assert_eq!(config.budget().time_limit, None);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "win_score": 10 }"#).unwrap();
        assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Validation(_))));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_build_ai_applies_settings() {
        let mut config = EngineConfig::with_depth(3).with_seed(1);
        config.randomize_ties = false;
        config.time_limit_ms = Some(250);

        let ai = config.build_ai();
        assert_eq!(ai.depth, 3);
        assert!(!ai.randomize_ties);
        assert_eq!(ai.win_score(), WIN_SCORE);
        assert_eq!(ai.budget.time_limit, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_build_ai_keeps_default_win_score_when_invalid() {
        let mut config = EngineConfig::with_depth(2);
        config.win_score = -5;
        assert!(config.validate().is_err());

        let mut ai = config.build_ai();
        assert_eq!(ai.win_score(), WIN_SCORE);
        let game = config.new_game();
        let result = ai.best_move(game.board(), crate::game::Player::Red);
        assert!(result.column.is_some());
    }
}
