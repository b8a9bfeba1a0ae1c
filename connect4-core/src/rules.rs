//! Terminal detection: four-in-a-row and draws

use crate::board::Board;
use crate::game::{GameResult, Player};

/// Whether `player` owns every cell of some horizontal, vertical, or
/// diagonal window of four. Scans the whole board.
pub fn has_four_in_a_row(board: &Board, player: Player) -> bool {
    let cell = player.cell();
    board.windows().any(|window| window.iter().all(|&c| c == cell))
}

/// Someone has connected four, or the board is full
pub fn is_terminal(board: &Board) -> bool {
    has_four_in_a_row(board, Player::Red)
        || has_four_in_a_row(board, Player::Yellow)
        || board.is_full()
}

/// Classify a position. Red is checked first if both sides have a line,
/// which cannot happen in legal play.
pub fn outcome(board: &Board) -> GameResult {
    if has_four_in_a_row(board, Player::Red) {
        GameResult::Win(Player::Red)
    } else if has_four_in_a_row(board, Player::Yellow) {
        GameResult::Win(Player::Yellow)
    } else if board.is_full() {
        GameResult::Draw
    } else {
        GameResult::Ongoing
    }
}
