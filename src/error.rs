use std::path::PathBuf;

/// A drop that the board cannot accept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is out of range (board width {width})")]
    ColumnOutOfRange { column: usize, width: usize },

    #[error("column {column} is full")]
    ColumnFull { column: usize },
}

/// Errors raised while constructing or parsing a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Width and height must be in `1..=u16::MAX`; the win condition must be
    /// at least 2.
    #[error("invalid board dimensions {width}x{height} with win condition {win_condition}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        win_condition: usize,
    },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell symbol {symbol:?} at row {row}, column {column}")]
    UnknownSymbol {
        symbol: String,
        row: usize,
        column: usize,
    },

    #[error("piece at row {row}, column {column} is floating above an empty cell")]
    FloatingPiece { row: usize, column: usize },
}

/// Errors from applying a move to a [`GameState`](crate::game::GameState).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("game is already over")]
    GameOver,
}

/// Errors that can occur when loading configuration or building an engine.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors that can occur while answering a move request.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid board: {0}")]
    Board(#[from] BoardError),

    #[error("invalid engine settings: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown piece {0:?} (expected \"X\" or \"O\")")]
    UnknownPiece(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while playing arena games.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error("cannot build contender: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid arena board: {0}")]
    Board(#[from] BoardError),

    #[error("agent {agent} returned no move on a live board")]
    NoMove { agent: String },

    #[error("agent {agent} selected illegal column {column} (legal: {legal:?})")]
    IllegalMove {
        agent: String,
        column: usize,
        legal: Vec<usize>,
    },
}
