use super::{Board, Piece};
use crate::error::StateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Piece),
    Draw,
}

/// A board plus whose turn it is. X moves first.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    board: Board,
    current_player: Piece,
    outcome: Option<GameOutcome>,
    move_count: usize,
}

impl GameState {
    /// Standard 7x6 connect-four game, X to move.
    pub fn initial() -> Self {
        Self::new(Board::standard())
    }

    /// Start a game from an empty board of any shape.
    pub fn new(board: Board) -> Self {
        Self::resume(board, Piece::X)
    }

    /// Continue a game from an existing position with `to_move` on turn.
    pub fn resume(board: Board, to_move: Piece) -> Self {
        let outcome = Self::classify(&board);
        let move_count = board.piece_count();
        GameState {
            board,
            current_player: to_move,
            outcome,
            move_count,
        }
    }

    fn classify(board: &Board) -> Option<GameOutcome> {
        if let Some(winner) = board.check_win() {
            Some(GameOutcome::Winner(winner))
        } else if board.is_full() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }

    pub fn current_player(&self) -> Piece {
        self.current_player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Number of pieces on the board.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Legal columns; empty once the game is over.
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.valid_moves()
    }

    /// Apply a move and return the new state (immutable)
    pub fn apply_move(&self, column: usize) -> Result<GameState, StateError> {
        let mut next = self.clone();
        next.apply_move_mut(column)?;
        Ok(next)
    }

    /// Apply a move in place. On error the state is unchanged.
    pub fn apply_move_mut(&mut self, column: usize) -> Result<(), StateError> {
        if self.is_terminal() {
            return Err(StateError::GameOver);
        }

        self.board.drop_piece(column, self.current_player)?;
        self.move_count += 1;
        self.outcome = Self::classify(&self.board);
        self.current_player = self.current_player.other();

        Ok(())
    }
}
