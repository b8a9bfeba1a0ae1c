//! Configuration types for match play

use connect4_core::{ConfigError, EngineConfig};

/// Seed used when a match has none
pub const DEFAULT_MATCH_SEED: u64 = 42;

/// Match configuration: two engines and how to pair them
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// First engine; plays Red in even-numbered games
    pub first: EngineConfig,
    /// Second engine; plays Red in odd-numbered games
    pub second: EngineConfig,
    /// Number of games (should be even for color alternation)
    pub games: usize,
    /// Random plies played before the engines take over
    pub random_openings: usize,
    /// Whether to run games in parallel
    pub parallel: bool,
    /// Base seed; game `i` uses `seed + i` (None = 42)
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            first: EngineConfig::default(),
            second: EngineConfig::default(),
            games: 10,
            random_openings: 2,
            parallel: true,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Default engines at the given depths
    pub fn alpha_beta(first_depth: u32, second_depth: u32) -> Self {
        Self {
            first: EngineConfig::with_depth(first_depth),
            second: EngineConfig::with_depth(second_depth),
            ..Default::default()
        }
    }

    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_random_openings(mut self, plies: usize) -> Self {
        self.random_openings = plies;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn base_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_MATCH_SEED)
    }

    /// Both engines must be valid and agree on the board size
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.first.validate()?;
        self.second.validate()?;

        if (self.first.rows, self.first.cols) != (self.second.rows, self.second.cols) {
            return Err(ConfigError::Validation(format!(
                "engines disagree on board size: {}x{} vs {}x{}",
                self.first.rows, self.first.cols, self.second.rows, self.second.cols
            )));
        }

        let cells = self.first.rows * self.first.cols;
        if self.random_openings >= cells {
            return Err(ConfigError::Validation(format!(
                "random_openings must be < {} (cells on the board)",
                cells
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_alpha_beta_builder() {
        let config = MatchConfig::alpha_beta(2, 5).with_games(4).with_seed(7).sequential();
        assert_eq!(config.first.depth, 2);
        assert_eq!(config.second.depth, 5);
        assert_eq!(config.games, 4);
        assert_eq!(config.base_seed(), 7);
        assert!(!config.parallel);
    }

    #[test]
    fn test_validation_rejects_size_mismatch() {
        let mut config = MatchConfig::default();
        config.second.cols = 8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_long_opening() {
        let config = MatchConfig::default().with_random_openings(42);
        assert!(config.validate().is_err());
    }
}
