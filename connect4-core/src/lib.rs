//! Connect4 Core - Game engine and AI
//!
//! This crate provides the core game logic for Connect Four:
//! - Board grid with gravity-drop placement and undo
//! - Terminal detection (four in a row, full board)
//! - Sliding-window position evaluation
//! - Minimax AI with alpha-beta pruning
//! - Engine configuration loaded from JSON

pub mod board;
pub mod game;
pub mod rules;
pub mod eval;
pub mod ai;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Cell, COLS, ROWS, WINDOW_LEN};
pub use game::{GameResult, GameState, Player};
pub use rules::{has_four_in_a_row, is_terminal, outcome};
pub use eval::{evaluate, evaluate_window, Heuristics};
pub use ai::{
    random_move, AlphaBetaAI, ColumnScore, SearchBudget, SearchResult, SearchStats,
    DEFAULT_DEPTH, WIN_SCORE,
};
pub use config::EngineConfig;
pub use error::{ConfigError, MoveError, ParseError};
