//! The two operations the engine offers to outside callers, plus the JSON
//! request/response payloads a transport layer would carry.
//!
//! A request is answered by a fresh engine, so nothing is cached between
//! requests.

use tracing::{debug, info};

use crate::ai::{EngineConfig, RankedMove, SearchEngine};
use crate::error::{BoardError, ConfigError, ProtocolError};
use crate::game::{Board, Cell, Piece, STANDARD_WIN_CONDITION};

/// Column sentinel used on the wire when there is no legal move.
pub const NO_MOVE: i64 = -1;

/// Best column for `engine_piece`, or `None` if the board is full.
pub fn choose_move(
    board: &Board,
    engine_piece: Piece,
    depth: i32,
    mistake_rate: f64,
) -> Result<Option<usize>, ConfigError> {
    let mut engine = SearchEngine::new(EngineConfig {
        piece: engine_piece,
        depth,
        mistake_rate,
        ..EngineConfig::default()
    })?;
    Ok(engine.choose_move(board))
}

/// The `top_k` best columns for `engine_piece` with their scores.
pub fn ranked_moves(
    board: &Board,
    engine_piece: Piece,
    depth: i32,
    top_k: usize,
) -> Result<Vec<RankedMove>, ConfigError> {
    let mut engine = SearchEngine::new(EngineConfig {
        piece: engine_piece,
        depth,
        ..EngineConfig::default()
    })?;
    Ok(engine.ranked_moves(board, top_k))
}

fn default_piece() -> String {
    "X".to_string()
}

fn default_depth() -> i32 {
    4
}

fn default_mistake_rate() -> f64 {
    0.1
}

fn default_name() -> String {
    "AI".to_string()
}

fn default_win_condition() -> usize {
    STANDARD_WIN_CONDITION
}

fn default_top_k() -> usize {
    3
}

/// Request payload. Only `board` is required.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Rows top to bottom; cells are `"X"`, `"O"` or `"_"`.
    pub board: Vec<Vec<String>>,
    #[serde(default = "default_piece")]
    pub ai_piece: String,
    #[serde(default = "default_depth")]
    pub ai_depth: i32,
    #[serde(default = "default_mistake_rate")]
    pub mistake_rate: f64,
    #[serde(default = "default_name")]
    pub ai_name: String,
    #[serde(default = "default_win_condition")]
    pub win_condition: usize,
    /// Number of ranked moves to return; 0 omits the list.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl MoveRequest {
    /// A request for `board` with every other field at its default.
    pub fn for_board(board: &Board) -> Self {
        MoveRequest {
            board: board
                .to_rows()
                .into_iter()
                .map(|row| row.into_iter().map(|c| c.symbol().to_string()).collect())
                .collect(),
            ai_piece: default_piece(),
            ai_depth: default_depth(),
            mistake_rate: default_mistake_rate(),
            ai_name: default_name(),
            win_condition: board.win_condition(),
            top_k: default_top_k(),
            seed: None,
        }
    }

    /// Decode the grid into a board.
    pub fn to_board(&self) -> Result<Board, BoardError> {
        let rows = self
            .board
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(column, symbol)| {
                        Cell::from_symbol(symbol).ok_or_else(|| BoardError::UnknownSymbol {
                            symbol: symbol.clone(),
                            row,
                            column,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Board::from_rows(&rows, self.win_condition)
    }
}

/// One entry of the ranked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RankedEntry {
    #[serde(rename = "move")]
    pub column: usize,
    pub score: i32,
}

impl From<RankedMove> for RankedEntry {
    fn from(m: RankedMove) -> Self {
        RankedEntry {
            column: m.column,
            score: m.score,
        }
    }
}

/// Response payload. `move` is 0-indexed, or [`NO_MOVE`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    #[serde(rename = "move")]
    pub column: i64,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranked_moves: Option<Vec<RankedEntry>>,
}

/// Answer one request. `base` supplies the settings the payload does not
/// carry (heuristic, cache policy, fallback seed).
pub fn handle_request(
    request: &MoveRequest,
    base: &EngineConfig,
) -> Result<MoveResponse, ProtocolError> {
    let board = request.to_board()?;
    let piece: Piece = request
        .ai_piece
        .parse()
        .map_err(ProtocolError::UnknownPiece)?;

    let config = EngineConfig {
        name: request.ai_name.clone(),
        piece,
        depth: request.ai_depth,
        mistake_rate: request.mistake_rate,
        seed: request.seed.or(base.seed),
        ..base.clone()
    };
    let mut engine = SearchEngine::new(config)?;

    let column = engine.choose_move(&board);
    let ranked_moves = (request.top_k > 0).then(|| {
        engine
            .ranked_moves(&board, request.top_k)
            .into_iter()
            .map(RankedEntry::from)
            .collect()
    });
    let explanation = engine.explanation();

    info!(
        engine = %request.ai_name,
        piece = %piece,
        depth = request.ai_depth,
        column = ?column,
        "answered move request"
    );
    debug!(%explanation);

    Ok(MoveResponse {
        column: column.map_or(NO_MOVE, |c| c as i64),
        explanation,
        ranked_moves,
    })
}

/// Parse a JSON request, answer it, and serialize the response.
pub fn respond_json(input: &str, base: &EngineConfig) -> Result<String, ProtocolError> {
    let request: MoveRequest = serde_json::from_str(input)?;
    let response = handle_request(&request, base)?;
    Ok(serde_json::to_string(&response)?)
}
