use std::fmt;
use std::str::FromStr;

use super::piece::Piece;
use crate::error::{BoardError, MoveError};

/// Standard Connect Four dimensions.
pub const STANDARD_WIDTH: usize = 7;
pub const STANDARD_HEIGHT: usize = 6;
pub const STANDARD_WIN_CONDITION: usize = 4;

/// Scan order for win detection: horizontal, vertical, diagonal down-right,
/// diagonal up-right. Each entry is (delta row, delta col).
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn piece(self) -> Option<Piece> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Piece::X),
            Cell::O => Some(Piece::O),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '_',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    /// Parse a cell from its wire symbol. Empty cells accept `_`, `.`, a
    /// blank string, or a single space.
    pub fn from_symbol(symbol: &str) -> Option<Cell> {
        match symbol {
            "_" | "." | "" | " " => Some(Cell::Empty),
            "X" | "x" => Some(Cell::X),
            "O" | "o" => Some(Cell::O),
            _ => None,
        }
    }

    fn bits(self) -> u64 {
        match self {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => 2,
        }
    }
}

/// Canonical, hashable encoding of a board: a header word with width and
/// height, a word with the win condition, then two bits per cell in
/// row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardKey(Box<[u64]>);

/// A connect-N grid with gravity. Row 0 is the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    win_condition: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board.
    pub fn new(width: usize, height: usize, win_condition: usize) -> Result<Self, BoardError> {
        let max_side = u16::MAX as usize;
        let shape_ok = (1..=max_side).contains(&width) && (1..=max_side).contains(&height);
        if !shape_ok || win_condition < 2 {
            return Err(BoardError::InvalidDimensions {
                width,
                height,
                win_condition,
            });
        }
        Ok(Board {
            width,
            height,
            win_condition,
            cells: vec![Cell::Empty; width * height],
        })
    }

    /// The classic 7x6 connect-four board.
    pub fn standard() -> Self {
        Board {
            width: STANDARD_WIDTH,
            height: STANDARD_HEIGHT,
            win_condition: STANDARD_WIN_CONDITION,
            cells: vec![Cell::Empty; STANDARD_WIDTH * STANDARD_HEIGHT],
        }
    }

    /// Build a board from a grid of rows (row 0 on top). The grid must be
    /// rectangular and obey gravity.
    pub fn from_rows(rows: &[Vec<Cell>], win_condition: usize) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut board = Board::new(width, height, win_condition)?;

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(BoardError::RaggedRows {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            let start = row * width;
            board.cells[start..start + width].copy_from_slice(cells);
        }

        for row in 0..height.saturating_sub(1) {
            for column in 0..width {
                if board.get(row, column) != Cell::Empty && board.get(row + 1, column) == Cell::Empty
                {
                    return Err(BoardError::FloatingPiece { row, column });
                }
            }
        }

        Ok(board)
    }

    /// Copy the grid out as rows, row 0 first.
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.width).map(<[Cell]>::to_vec).collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn win_condition(&self) -> usize {
        self.win_condition
    }

    /// Get the cell at a specific position.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height` or `col >= width`.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) is outside a {}x{} board",
            self.width,
            self.height
        );
        self.cells[row * self.width + col]
    }

    pub fn try_get(&self, row: usize, col: usize) -> Option<Cell> {
        (row < self.height && col < self.width).then(|| self.cells[row * self.width + col])
    }

    /// A column is open iff its top cell is empty. Out-of-range columns are
    /// never open.
    pub fn is_column_open(&self, col: usize) -> bool {
        col < self.width && self.cells[col] == Cell::Empty
    }

    /// Open columns in ascending order.
    pub fn valid_moves(&self) -> Vec<usize> {
        (0..self.width).filter(|&col| self.is_column_open(col)).collect()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.width).all(|col| !self.is_column_open(col))
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Drop a piece in a column, returns the row where it landed. The board
    /// is left untouched on error.
    pub fn drop_piece(&mut self, col: usize, piece: Piece) -> Result<usize, MoveError> {
        if col >= self.width {
            return Err(MoveError::ColumnOutOfRange {
                column: col,
                width: self.width,
            });
        }

        let row = (0..self.height)
            .rev()
            .find(|&row| self.cells[row * self.width + col] == Cell::Empty)
            .ok_or(MoveError::ColumnFull { column: col })?;
        self.cells[row * self.width + col] = piece.to_cell();
        Ok(row)
    }

    /// Scan the whole board for a run of `win_condition` identical pieces.
    ///
    /// Cells are visited row-major with columns ascending, and each cell
    /// tries the directions in [`DIRECTIONS`] order; the first run found
    /// decides the result, so boards with two winners resolve
    /// deterministically.
    pub fn check_win(&self) -> Option<Piece> {
        for row in 0..self.height {
            for col in 0..self.width {
                let Some(piece) = self.get(row, col).piece() else {
                    continue;
                };
                if DIRECTIONS
                    .iter()
                    .any(|&(dr, dc)| self.run_from(row, col, dr, dc, piece.to_cell()))
                {
                    return Some(piece);
                }
            }
        }
        None
    }

    /// True if `win_condition` cells starting at (row, col) and stepping by
    /// (dr, dc) all hold `cell`.
    fn run_from(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> bool {
        let span = self.win_condition - 1;
        let in_bounds = matches!(
            (offset(row, dr, span), offset(col, dc, span)),
            (Some(r), Some(c)) if r < self.height && c < self.width
        );
        if !in_bounds {
            return false;
        }

        // Both ends are on the board, so every step in between is too.
        (1..self.win_condition).all(|step| {
            match (offset(row, dr, step), offset(col, dc, step)) {
                (Some(r), Some(c)) => self.cells[r * self.width + c] == cell,
                _ => false,
            }
        })
    }

    /// Canonical encoding used for transposition-cache keys.
    pub fn key(&self) -> BoardKey {
        let mut words = Vec::with_capacity(2 + self.cells.len().div_ceil(32));
        words.push(self.width as u64 | (self.height as u64) << 16);
        words.push(self.win_condition as u64);
        for chunk in self.cells.chunks(32) {
            let word = chunk
                .iter()
                .enumerate()
                .fold(0u64, |acc, (i, cell)| acc | cell.bits() << (2 * i));
            words.push(word);
        }
        BoardKey(words.into_boxed_slice())
    }
}

/// `pos + delta * steps`, or `None` if that leaves `usize`.
fn offset(pos: usize, delta: isize, steps: usize) -> Option<usize> {
    let distance = delta.unsigned_abs().checked_mul(steps)?;
    if delta < 0 {
        pos.checked_sub(distance)
    } else {
        pos.checked_add(distance)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.width).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

/// Parses the [`Display`](fmt::Display) form with a connect-4 win condition.
/// Blank lines and whitespace inside lines are ignored.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for line in s.lines().filter(|l| !l.trim().is_empty()) {
            let row_index = rows.len();
            let row = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .enumerate()
                .map(|(column, ch)| {
                    Cell::from_symbol(ch.encode_utf8(&mut [0; 4])).ok_or_else(|| {
                        BoardError::UnknownSymbol {
                            symbol: ch.to_string(),
                            row: row_index,
                            column,
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Board::from_rows(&rows, STANDARD_WIN_CONDITION)
    }
}
