//! Error types for moves, move strings, and configuration

use std::path::PathBuf;

/// Errors from applying a move to a board or game
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("column {column} is out of range (board has {cols} columns)")]
    ColumnOutOfRange { column: usize, cols: usize },

    #[error("no piece to remove at row {row} of column {column}")]
    NotTopPiece { column: usize, row: usize },

    #[error("game is already over")]
    GameOver,
}

/// Errors from parsing a move string such as `4453`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid column {found:?} at position {position}")]
    InvalidColumn { position: usize, found: char },

    #[error("illegal move at position {position}: {source}")]
    IllegalMove {
        position: usize,
        #[source]
        source: MoveError,
    },
}

/// Errors from loading or validating an engine configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_display() {
        let err = MoveError::ColumnFull { column: 3 };
        assert_eq!(err.to_string(), "column 3 is full");

        let err = MoveError::ColumnOutOfRange { column: 9, cols: 7 };
        assert_eq!(err.to_string(), "column 9 is out of range (board has 7 columns)");
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::IllegalMove {
            position: 6,
            source: MoveError::ColumnFull { column: 0 },
        };
        assert_eq!(err.to_string(), "illegal move at position 6: column 0 is full");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("depth must be <= 42".to_string());
        assert_eq!(err.to_string(), "config validation error: depth must be <= 42");
    }
}
