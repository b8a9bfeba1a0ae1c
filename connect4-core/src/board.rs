//! Board grid with gravity-drop placement

use serde::{Deserialize, Serialize};

use crate::error::MoveError;
use crate::game::Player;

/// Standard board height
pub const ROWS: usize = 6;

/// Standard board width
pub const COLS: usize = 7;

/// Number of cells in a connection
pub const WINDOW_LEN: usize = 4;

/// Window scan directions as (row step, col step)
/// Index: 0=horizontal, 1=vertical, 2=diagonal down-right, 3=diagonal up-right
pub const DIRECTIONS: [(isize, isize); 4] = [
    (0, 1),  // -
    (1, 0),  // |
    (1, 1),  // \
    (-1, 1), // /
];

/// Contents of a single board cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Rectangular Connect Four board
///
/// Row 0 is the top row and row `rows - 1` the bottom one. Pieces fall
/// to the lowest empty cell of a column, so every column is a contiguous
/// stack growing upward from the bottom row.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board of the given size
    pub fn new(rows: usize, cols: usize) -> Self {
        debug_assert!(rows > 0 && cols > 0, "board dimensions must be non-zero");
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Create an empty 6x7 board
    pub fn standard() -> Self {
        Self::new(ROWS, COLS)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at (row, col); row 0 is the top
    ///
    /// Panics if (row, col) lies outside the board.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Read-only view of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Whether a piece can still be dropped into `col`
    pub fn is_column_open(&self, col: usize) -> bool {
        col < self.cols && self.get(0, col).is_empty()
    }

    /// Columns that accept a piece, in ascending order
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.cols).filter(|&col| self.is_column_open(col)).collect()
    }

    /// Drop a piece into `column`, returning the row where it landed
    pub fn drop_piece(&mut self, column: usize, player: Player) -> Result<usize, MoveError> {
        if column >= self.cols {
            return Err(MoveError::ColumnOutOfRange {
                column,
                cols: self.cols,
            });
        }

        let row = (0..self.rows)
            .rev()
            .find(|&row| self.get(row, column).is_empty())
            .ok_or(MoveError::ColumnFull { column })?;

        let idx = self.index(row, column);
        self.cells[idx] = player.cell();
        Ok(row)
    }

    /// Clear the cell at (row, column)
    ///
    /// Only the topmost piece of a column may be removed; anything else
    /// would leave a floating piece. On error the board is unchanged.
    pub fn undo(&mut self, column: usize, row: usize) -> Result<(), MoveError> {
        if column >= self.cols {
            return Err(MoveError::ColumnOutOfRange {
                column,
                cols: self.cols,
            });
        }
        if self.top_row(column) != Some(row) {
            return Err(MoveError::NotTopPiece { column, row });
        }

        let idx = self.index(row, column);
        self.cells[idx] = Cell::Empty;
        Ok(())
    }

    /// Row of the topmost piece in `column`; `None` for an empty or
    /// out-of-range column
    pub fn top_row(&self, column: usize) -> Option<usize> {
        if column >= self.cols {
            return None;
        }
        (0..self.rows).find(|&row| !self.get(row, column).is_empty())
    }

    /// Number of pieces stacked in `column`
    pub fn column_height(&self, column: usize) -> usize {
        self.top_row(column).map_or(0, |row| self.rows - row)
    }

    /// Total pieces on the board
    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// No column accepts another piece
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| !self.is_column_open(col))
    }

    /// Every run of `WINDOW_LEN` cells along the four scan directions
    pub fn windows(&self) -> impl Iterator<Item = [Cell; WINDOW_LEN]> + '_ {
        DIRECTIONS.iter().flat_map(move |&(dr, dc)| {
            (0..self.rows).flat_map(move |row| {
                (0..self.cols).filter_map(move |col| self.window_at(row, col, dr, dc))
            })
        })
    }

    fn window_at(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<[Cell; WINDOW_LEN]> {
        let span = WINDOW_LEN as isize - 1;
        let end_row = row as isize + dr * span;
        let end_col = col as isize + dc * span;
        if end_row < 0 || end_row >= self.rows as isize || end_col < 0 || end_col >= self.cols as isize {
            return None;
        }

        let mut window = [Cell::Empty; WINDOW_LEN];
        for (i, slot) in window.iter_mut().enumerate() {
            let r = (row as isize + dr * i as isize) as usize;
            let c = (col as isize + dc * i as isize) as usize;
            *slot = self.get(r, c);
        }
        Some(window)
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({}, {}) is outside a {}x{} board",
            row,
            col,
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
