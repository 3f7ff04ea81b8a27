//! Core connect-N game logic: board representation, pieces, and a game
//! state machine with immutable transitions.

mod board;
mod piece;
mod state;

pub use board::{
    Board, BoardKey, Cell, STANDARD_HEIGHT, STANDARD_WIDTH, STANDARD_WIN_CONDITION,
};
pub use piece::Piece;
pub use state::{GameOutcome, GameState};
