//! Players, game results, and turn-tracking game state

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell};
use crate::error::{MoveError, ParseError};
use crate::rules;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color. Red moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Red = 0,
    Yellow = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Yellow,
            Player::Yellow => Player::Red,
        }
    }

    /// Cell value for this player's pieces
    pub fn cell(self) -> Cell {
        match self {
            Player::Red => Cell::Red,
            Player::Yellow => Cell::Yellow,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::Red => "Red",
            Player::Yellow => "Yellow",
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    Win(Player),
    Draw,
}

impl GameResult {
    pub fn is_over(self) -> bool {
        self != GameResult::Ongoing
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Win(player) => Some(player),
            _ => None,
        }
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// A board plus whose turn it is and the columns played so far
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    to_move: Player,
    history: Vec<usize>,
}

impl GameState {
    /// Empty board of the given size, Red to move
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_board(Board::new(rows, cols), Player::Red)
    }

    /// Empty 6x7 board, Red to move
    pub fn standard() -> Self {
        Self::from_board(Board::standard(), Player::Red)
    }

    /// Continue from an existing position. History starts empty.
    pub fn from_board(board: Board, to_move: Player) -> Self {
        Self {
            board,
            to_move,
            history: Vec::new(),
        }
    }

    /// Replay a string of 1-based column digits (`"4453"` = columns 3, 3, 4, 2)
    /// on an empty board, Red first
    pub fn from_moves(rows: usize, cols: usize, moves: &str) -> Result<Self, ParseError> {
        let mut state = Self::new(rows, cols);
        for (position, ch) in moves.chars().enumerate() {
            let column = ch
                .to_digit(10)
                .filter(|&d| d >= 1)
                .map(|d| d as usize - 1)
                .ok_or(ParseError::InvalidColumn { position, found: ch })?;
            state
                .play(column)
                .map_err(|source| ParseError::IllegalMove { position, source })?;
        }
        Ok(state)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.to_move
    }

    /// Columns played so far, 0-based
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// History as 1-based column digits, the inverse of [`GameState::from_moves`]
    pub fn move_string(&self) -> String {
        self.history
            .iter()
            .map(|&col| char::from_digit(col as u32 + 1, 10).unwrap_or('?'))
            .collect()
    }

    pub fn legal_columns(&self) -> Vec<usize> {
        if self.result().is_over() {
            Vec::new()
        } else {
            self.board.legal_columns()
        }
    }

    pub fn result(&self) -> GameResult {
        rules::outcome(&self.board)
    }

    /// Drop the current player's piece into `column` and pass the turn
    pub fn play(&mut self, column: usize) -> Result<usize, MoveError> {
        if self.result().is_over() {
            return Err(MoveError::GameOver);
        }
        let row = self.board.drop_piece(column, self.to_move)?;
        self.history.push(column);
        self.to_move = self.to_move.opponent();
        Ok(row)
    }

    /// Take back the last move, returning its column
    pub fn undo_last(&mut self) -> Option<usize> {
        let column = *self.history.last()?;
        let row = self.board.top_row(column)?;
        self.board.undo(column, row).ok()?;
        self.history.pop();
        self.to_move = self.to_move.opponent();
        Some(column)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{COLS, ROWS};

    #[test]
    fn test_other_player() {
        assert_eq!(Player::Red.opponent(), Player::Yellow);
        assert_eq!(Player::Yellow.opponent(), Player::Red);
        assert_eq!(Player::Red.cell(), Cell::Red);
        assert_eq!(Player::Yellow.name(), "Yellow");
    }

    #[test]
    fn test_play_alternates_turns() {
        let mut game = GameState::standard();
        assert_eq!(game.current_player(), Player::Red);

        assert_eq!(game.play(3), Ok(5));
        assert_eq!(game.current_player(), Player::Yellow);
        assert_eq!(game.play(3), Ok(4));
        assert_eq!(game.board().get(5, 3), Cell::Red);
        assert_eq!(game.board().get(4, 3), Cell::Yellow);
        assert_eq!(game.history(), &[3, 3]);
    }

    #[test]
    fn test_from_moves_and_move_string() {
        let game = GameState::from_moves(ROWS, COLS, "4453").unwrap();
        assert_eq!(game.history(), &[3, 3, 4, 2]);
        assert_eq!(game.move_string(), "4453");
        assert_eq!(game.current_player(), Player::Red);
    }

    #[test]
    fn test_from_moves_rejects_bad_input() {
        assert_eq!(
            GameState::from_moves(ROWS, COLS, "12x"),
            Err(ParseError::InvalidColumn { position: 2, found: 'x' })
        );
        assert_eq!(
            GameState::from_moves(ROWS, COLS, "0"),
            Err(ParseError::InvalidColumn { position: 0, found: '0' })
        );
        assert_eq!(
            GameState::from_moves(ROWS, COLS, "8"),
            Err(ParseError::IllegalMove {
                position: 0,
                source: MoveError::ColumnOutOfRange { column: 7, cols: 7 },
            })
        );
        assert_eq!(
            GameState::from_moves(ROWS, COLS, "1111111"),
            Err(ParseError::IllegalMove {
                position: 6,
                source: MoveError::ColumnFull { column: 0 },
            })
        );
    }

    #[test]
    fn test_play_after_win_is_rejected() {
        // Red stacks column 1 while Yellow plays column 2
        let mut game = GameState::from_moves(ROWS, COLS, "1212121").unwrap();
        assert_eq!(game.result(), GameResult::Win(Player::Red));
        assert!(game.legal_columns().is_empty());
        assert_eq!(game.play(4), Err(MoveError::GameOver));
    }

    #[test]
    fn test_undo_last() {
        let mut game = GameState::from_moves(ROWS, COLS, "44").unwrap();
        let before = GameState::from_moves(ROWS, COLS, "4").unwrap();

        assert_eq!(game.undo_last(), Some(3));
        assert_eq!(game, before);
        assert_eq!(game.undo_last(), Some(3));
        assert_eq!(game.undo_last(), None);
        assert_eq!(game.current_player(), Player::Red);
    }

    #[test]
    fn test_game_result_helpers() {
        assert!(!GameResult::Ongoing.is_over());
        assert!(GameResult::Draw.is_over());
        assert_eq!(GameResult::Win(Player::Yellow).winner(), Some(Player::Yellow));
        assert_eq!(GameResult::Draw.winner(), None);
    }
}
