//! Position evaluation

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, WINDOW_LEN};
use crate::game::Player;

/// Heuristic weights for position evaluation
///
/// `opponent_three` is deliberately smaller in magnitude than `three`, so
/// the evaluation prefers building its own threat over blocking one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Bonus per own piece in the center column
    pub center_weight: i32,
    /// Window fully owned (a connection the terminal check should already see)
    pub four: i32,
    /// Three own pieces and one empty cell
    pub three: i32,
    /// Two own pieces and two empty cells
    pub two: i32,
    /// Three opponent pieces and one empty cell
    pub opponent_three: i32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            center_weight: 3,
            four: 100,
            three: 5,
            two: 2,
            opponent_three: -4,
        }
    }
}

impl Heuristics {
    /// Upper bound on `|evaluate(board, ..)|` for a board of this size
    pub fn max_magnitude(&self, rows: usize, cols: usize) -> i64 {
        let span = WINDOW_LEN - 1;
        let horizontal = rows * cols.saturating_sub(span);
        let vertical = rows.saturating_sub(span) * cols;
        let diagonal = 2 * rows.saturating_sub(span) * cols.saturating_sub(span);
        let windows = (horizontal + vertical + diagonal) as i64;

        let own = [self.four, self.three, self.two]
            .iter()
            .map(|w| (*w as i64).abs())
            .max()
            .unwrap_or(0);
        let per_window = own + (self.opponent_three as i64).abs();

        windows * per_window + (self.center_weight as i64).abs() * rows as i64
    }
}

/// Evaluate position from `player`'s perspective
pub fn evaluate(board: &Board, player: Player, heuristics: &Heuristics) -> i32 {
    let own = player.cell();
    let center = board.cols() / 2;

    let center_count = (0..board.rows())
        .filter(|&row| board.get(row, center) == own)
        .count() as i32;
    let mut score = center_count * heuristics.center_weight;

    for window in board.windows() {
        score += evaluate_window(&window, player, heuristics);
    }

    score
}

/// Score a single window of four cells
pub fn evaluate_window(window: &[Cell; WINDOW_LEN], player: Player, heuristics: &Heuristics) -> i32 {
    let own_cell = player.cell();
    let opp_cell = player.opponent().cell();

    let own = window.iter().filter(|&&c| c == own_cell).count();
    let opp = window.iter().filter(|&&c| c == opp_cell).count();
    let empty = WINDOW_LEN - own - opp;

    let mut score = match (own, empty) {
        (4, _) => heuristics.four,
        (3, 1) => heuristics.three,
        (2, 2) => heuristics.two,
        _ => 0,
    };
    if opp == 3 && empty == 1 {
        score += heuristics.opponent_three;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use Cell::{Empty as E, Red as R, Yellow as Y};

    #[test]
    fn test_default_heuristics() {
        let h = Heuristics::default();
        assert!(h.four > h.three);
        assert!(h.three > h.two);
        assert!(h.opponent_three < 0);
        assert!(h.three > h.opponent_three.abs());
    }

    #[test]
    fn test_window_rules() {
        let h = Heuristics::default();
        assert_eq!(evaluate_window(&[R, R, R, R], Player::Red, &h), 100);
        assert_eq!(evaluate_window(&[R, R, E, R], Player::Red, &h), 5);
        assert_eq!(evaluate_window(&[E, R, R, E], Player::Red, &h), 2);
        assert_eq!(evaluate_window(&[Y, Y, E, Y], Player::Red, &h), -4);
        assert_eq!(evaluate_window(&[R, R, R, Y], Player::Red, &h), 0);
        assert_eq!(evaluate_window(&[R, E, E, E], Player::Red, &h), 0);
        assert_eq!(evaluate_window(&[R, R, Y, E], Player::Red, &h), 0);
        assert_eq!(evaluate_window(&[E, E, E, E], Player::Yellow, &h), 0);
        // Same window from the other side
        assert_eq!(evaluate_window(&[Y, Y, E, Y], Player::Yellow, &h), 5);
        assert_eq!(evaluate_window(&[R, R, E, R], Player::Yellow, &h), -4);
    }

    #[test]
    fn test_empty_board_scores_zero() {
        let board = Board::standard();
        assert_eq!(evaluate(&board, Player::Red, &Heuristics::default()), 0);
        assert_eq!(evaluate(&board, Player::Yellow, &Heuristics::default()), 0);
    }

    #[test]
    fn test_center_piece_bonus() {
        let mut board = Board::standard();
        board.drop_piece(3, Player::Red).unwrap();
        // One center piece; no window has two own pieces
        assert_eq!(evaluate(&board, Player::Red, &Heuristics::default()), 3);
        assert_eq!(evaluate(&board, Player::Yellow, &Heuristics::default()), 0);
    }

    #[test]
    fn test_open_three_on_bottom_row() {
        let mut board = Board::standard();
        for col in 0..3 {
            board.drop_piece(col, Player::Red).unwrap();
        }
        let h = Heuristics::default();

        // Window (5,0)..(5,3) is R R R _
        let window = [board.get(5, 0), board.get(5, 1), board.get(5, 2), board.get(5, 3)];
        assert_eq!(evaluate_window(&window, Player::Red, &h), 5);

        // Bottom row windows: RRR_ (+5), RR__ (+2); no center pieces
        assert_eq!(evaluate(&board, Player::Red, &h), 7);
        // Yellow faces one open three
        assert_eq!(evaluate(&board, Player::Yellow, &h), -4);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let mut board = Board::standard();
        for (col, player) in [(3, Player::Red), (2, Player::Yellow), (3, Player::Red), (4, Player::Yellow)] {
            board.drop_piece(col, player).unwrap();
        }
        let h = Heuristics::default();
        assert_eq!(evaluate(&board, Player::Red, &h), evaluate(&board, Player::Red, &h));
    }

    #[test]
    fn test_max_magnitude_bounds_evaluation() {
        let h = Heuristics::default();
        // 69 windows * (100 + 4) + 3 * 6
        assert_eq!(h.max_magnitude(6, 7), 69 * 104 + 18);
        assert_eq!(h.max_magnitude(3, 3), 9);

        let mut board = Board::standard();
        for col in 0..7 {
            for _ in 0..6 {
                board.drop_piece(col, Player::Red).unwrap();
            }
        }
        let score = evaluate(&board, Player::Red, &h) as i64;
        assert!(score.abs() <= h.max_magnitude(6, 7));
    }
}
