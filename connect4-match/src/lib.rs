//! Connect4 Match - engine-vs-engine games
//!
//! Plays series of games between two engine configurations, alternating
//! colors, optionally in parallel.

pub mod config;
pub mod game_runner;
pub mod match_play;

pub use config::MatchConfig;
pub use game_runner::{GameOutcome, GameRunner};
pub use match_play::{play_match, MatchResult};
