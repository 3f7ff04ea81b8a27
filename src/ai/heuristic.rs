use crate::game::{Board, Cell, Piece};

/// Trait for evaluating a non-terminal board position from a piece's
/// perspective. Positive is good for `piece`.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board, piece: Piece) -> i32;
}

/// Which heuristic an engine uses, as named in config files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    #[default]
    Center,
    Streak,
}

impl HeuristicKind {
    pub fn build(self) -> Box<dyn Heuristic> {
        match self {
            HeuristicKind::Center => Box::new(CenterColumnHeuristic),
            HeuristicKind::Streak => Box::new(StreakHeuristic),
        }
    }
}

const CENTER_WEIGHT: i32 = 5;

/// The column the center bonus applies to. For even widths this is the
/// right-hand of the two middle columns.
pub fn center_column(board: &Board) -> usize {
    board.width() / 2
}

/// +5 for each own piece and -5 for each opposing piece in the center column.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterColumnHeuristic;

impl Heuristic for CenterColumnHeuristic {
    fn evaluate(&self, board: &Board, piece: Piece) -> i32 {
        let own = piece.to_cell();
        let col = center_column(board);
        (0..board.height())
            .map(|row| match board.get(row, col) {
                Cell::Empty => 0,
                c if c == own => CENTER_WEIGHT,
                _ => -CENTER_WEIGHT,
            })
            .sum()
    }
}

/// Center bonus plus a score for every open-ended run through each piece.
///
/// Each occupied cell is scored along four axes. A run that already reaches
/// the win condition is worth 100; otherwise runs of 3, 2 and 1 with at least
/// one open end are worth 50, 10 and 1. Opponent runs count negatively.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakHeuristic;

const AXES: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

impl StreakHeuristic {
    fn streak_score(board: &Board, row: usize, col: usize, dr: isize, dc: isize) -> i32 {
        let cell = board.get(row, col);
        let mut streak = 1;
        let mut open_ends = 0;

        for sign in [1, -1] {
            for step in 1..board.win_condition() as isize {
                let r = row as isize + sign * step * dr;
                let c = col as isize + sign * step * dc;
                if r < 0 || c < 0 {
                    break;
                }
                match board.try_get(r as usize, c as usize) {
                    Some(other) if other == cell => streak += 1,
                    Some(Cell::Empty) => {
                        open_ends += 1;
                        break;
                    }
                    _ => break,
                }
            }
        }

        if streak >= board.win_condition() {
            return 100;
        }
        match (streak, open_ends > 0) {
            (3, true) => 50,
            (2, true) => 10,
            (1, true) => 1,
            _ => 0,
        }
    }
}

impl Heuristic for StreakHeuristic {
    fn evaluate(&self, board: &Board, piece: Piece) -> i32 {
        let own = piece.to_cell();
        let mut score = CenterColumnHeuristic.evaluate(board, piece);

        for row in 0..board.height() {
            for col in 0..board.width() {
                let cell = board.get(row, col);
                if cell == Cell::Empty {
                    continue;
                }
                let sign = if cell == own { 1 } else { -1 };
                for &(dr, dc) in &AXES {
                    score += sign * Self::streak_score(board, row, col, dr, dc);
                }
            }
        }

        score
    }
}
