//! Headless matches between agents, used to sanity-check engine strength.

use tracing::{debug, info};

use crate::ai::{Agent, EngineConfig, RandomAgent, SearchEngine};
use crate::error::{ArenaError, ConfigError};
use crate::game::{
    Board, GameOutcome, GameState, Piece, STANDARD_HEIGHT, STANDARD_WIDTH, STANDARD_WIN_CONDITION,
};

/// Match settings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub games: usize,
    pub width: usize,
    pub height: usize,
    pub win_condition: usize,
    pub opponent: OpponentKind,
    /// Search depth when the opponent is an engine.
    pub opponent_depth: i32,
    pub opponent_mistake_rate: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            games: 20,
            width: STANDARD_WIDTH,
            height: STANDARD_HEIGHT,
            win_condition: STANDARD_WIN_CONDITION,
            opponent: OpponentKind::Random,
            opponent_depth: 2,
            opponent_mistake_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentKind {
    #[default]
    Random,
    Engine,
}

/// One side of a match. A fresh agent is built for every game, so engine
/// caches live for exactly one game.
#[derive(Debug, Clone)]
pub enum Contender {
    Engine(EngineConfig),
    Random { seed: Option<u64> },
}

impl Contender {
    pub fn name(&self) -> String {
        match self {
            Contender::Engine(config) => format!("{} (depth {})", config.name, config.depth),
            Contender::Random { .. } => "Random".to_string(),
        }
    }

    /// Build the agent for game number `game`, playing `piece`. Seeds are
    /// offset by the game number so seeded matches still vary per game.
    fn build(&self, piece: Piece, game: usize) -> Result<Box<dyn Agent>, ConfigError> {
        let seed_for = |seed: Option<u64>| seed.map(|s| s.wrapping_add(game as u64));
        let agent: Box<dyn Agent> = match self {
            Contender::Engine(config) => Box::new(SearchEngine::new(EngineConfig {
                piece,
                seed: seed_for(config.seed),
                ..config.clone()
            })?),
            Contender::Random { seed } => Box::new(match seed_for(*seed) {
                Some(s) => RandomAgent::seeded(s),
                None => RandomAgent::new(),
            }),
        };
        Ok(agent)
    }
}

/// A finished game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub moves: Vec<usize>,
    pub outcome: GameOutcome,
}

/// Play one game to completion. `x` moves first.
pub fn play_game(
    x: &mut dyn Agent,
    o: &mut dyn Agent,
    board: Board,
) -> Result<GameRecord, ArenaError> {
    let mut state = GameState::new(board);
    let mut moves = Vec::new();

    while !state.is_terminal() {
        let agent: &mut dyn Agent = match state.current_player() {
            Piece::X => &mut *x,
            Piece::O => &mut *o,
        };
        let column = agent.select_action(&state).ok_or_else(|| ArenaError::NoMove {
            agent: agent.name().to_string(),
        })?;
        if state.apply_move_mut(column).is_err() {
            return Err(ArenaError::IllegalMove {
                agent: agent.name().to_string(),
                column,
                legal: state.legal_actions(),
            });
        }
        moves.push(column);
    }

    // Loop only exits on a terminal state.
    let outcome = state.outcome().unwrap_or(GameOutcome::Draw);
    Ok(GameRecord { moves, outcome })
}

/// Tally of a match between contenders A and B.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchStats {
    pub games: usize,
    pub a_wins: usize,
    pub b_wins: usize,
    pub draws: usize,
    pub total_moves: usize,
}

impl MatchStats {
    pub fn record(&mut self, winner_is_a: Option<bool>, length: usize) {
        self.games += 1;
        self.total_moves += length;
        match winner_is_a {
            Some(true) => self.a_wins += 1,
            Some(false) => self.b_wins += 1,
            None => self.draws += 1,
        }
    }

    pub fn a_win_rate(&self) -> f64 {
        self.rate(self.a_wins)
    }

    pub fn b_win_rate(&self) -> f64 {
        self.rate(self.b_wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn average_length(&self) -> f64 {
        self.rate(self.total_moves)
    }

    fn rate(&self, count: usize) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        count as f64 / self.games as f64
    }
}

/// Play `config.games` games, alternating which contender moves first.
pub fn run_match(
    a: &Contender,
    b: &Contender,
    config: &ArenaConfig,
) -> Result<MatchStats, ArenaError> {
    let board = Board::new(config.width, config.height, config.win_condition)?;
    let mut stats = MatchStats::default();

    for game in 0..config.games {
        let a_piece = if game % 2 == 0 { Piece::X } else { Piece::O };
        let mut agent_a = a.build(a_piece, game)?;
        let mut agent_b = b.build(a_piece.other(), game)?;

        let record = if a_piece == Piece::X {
            play_game(agent_a.as_mut(), agent_b.as_mut(), board.clone())?
        } else {
            play_game(agent_b.as_mut(), agent_a.as_mut(), board.clone())?
        };

        let winner_is_a = match record.outcome {
            GameOutcome::Winner(piece) => Some(piece == a_piece),
            GameOutcome::Draw => None,
        };
        debug!(game, outcome = ?record.outcome, length = record.moves.len(), "game finished");
        stats.record(winner_is_a, record.moves.len());
    }

    info!(
        a = %a.name(),
        b = %b.name(),
        games = stats.games,
        a_wins = stats.a_wins,
        b_wins = stats.b_wins,
        draws = stats.draws,
        "match finished"
    );
    Ok(stats)
}
