//! # Connect N
//!
//! A connect-N board (any width, height and win length) with a minimax
//! decision engine: alpha-beta pruning, a transposition cache, an optional
//! mistake rate and a ranked view of candidate moves.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: cells, board, piece, state machine
//! - [`ai`]: Agent trait, search engine, heuristics, transposition cache
//! - [`protocol`]: `choose_move` / `ranked_moves` and the JSON request payloads
//! - [`arena`]: Headless matches between agents
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod arena;
pub mod config;
pub mod error;
pub mod game;
pub mod protocol;
