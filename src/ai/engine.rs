use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::agent::Agent;
use super::cache::{CacheKey, CacheScope, TranspositionCache};
use super::heuristic::{Heuristic, HeuristicKind};
use crate::error::ConfigError;
use crate::game::{Board, GameState, Piece};

pub type Score = i32;

/// Base score for a decided game; the remaining depth is added on top so
/// that quicker wins (and slower losses) rank higher.
pub const WIN_SCORE: Score = 1000;

const NEG_INF: Score = Score::MIN;
const POS_INF: Score = Score::MAX;

/// Search engine settings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Display name, informational only.
    pub name: String,
    /// The piece the engine plays.
    pub piece: Piece,
    /// Plies searched from the root. Must be >= 0.
    pub depth: i32,
    /// Probability in [0, 1] of playing a uniformly random legal move.
    pub mistake_rate: f64,
    pub heuristic: HeuristicKind,
    pub cache_scope: CacheScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_max_entries: Option<usize>,
    /// Fixed RNG seed; the OS seeds the RNG when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            name: "AI".to_string(),
            piece: Piece::O,
            depth: 4,
            mistake_rate: 0.0,
            heuristic: HeuristicKind::Center,
            cache_scope: CacheScope::Session,
            cache_max_entries: None,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth < 0 {
            return Err(ConfigError::Validation(format!(
                "engine.depth must be >= 0 (got {})",
                self.depth
            )));
        }
        if !(0.0..=1.0).contains(&self.mistake_rate) {
            return Err(ConfigError::Validation(format!(
                "engine.mistake_rate must be in [0, 1] (got {})",
                self.mistake_rate
            )));
        }
        if self.cache_max_entries == Some(0) {
            return Err(ConfigError::Validation(
                "engine.cache_max_entries must be > 0 when set".into(),
            ));
        }
        Ok(())
    }
}

/// Why the engine picked a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    /// Best move found by the search.
    Searched,
    /// Random move taken under the mistake rate; no search was run.
    Mistake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveDecision {
    pub column: usize,
    /// Search score of the column; `None` for mistakes.
    pub score: Option<Score>,
    pub kind: DecisionKind,
}

/// A candidate column with its search score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RankedMove {
    pub column: usize,
    pub score: Score,
}

/// Counters for the most recent top-level search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cache_hits: u64,
    pub cutoffs: u64,
}

/// Depth-limited minimax with alpha-beta pruning and a transposition cache.
///
/// The engine maximizes for its own piece and assumes the opponent
/// minimizes. Every branch clones the board before dropping a piece, so a
/// board passed in by the caller is never modified.
pub struct SearchEngine {
    name: String,
    engine_piece: Piece,
    opponent_piece: Piece,
    depth: u32,
    mistake_rate: f64,
    heuristic: Box<dyn Heuristic>,
    cache: TranspositionCache,
    rng: StdRng,
    stats: SearchStats,
    last_decision: Option<MoveDecision>,
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(SearchEngine {
            name: config.name,
            engine_piece: config.piece,
            opponent_piece: config.piece.other(),
            depth: config.depth as u32,
            mistake_rate: config.mistake_rate,
            heuristic: config.heuristic.build(),
            cache: TranspositionCache::new(config.cache_scope, config.cache_max_entries),
            rng,
            stats: SearchStats::default(),
            last_decision: None,
        })
    }

    /// Replace the random source used for mistakes.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Box<dyn Heuristic>) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn piece(&self) -> Piece {
        self.engine_piece
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn mistake_rate(&self) -> f64 {
        self.mistake_rate
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn cache(&self) -> &TranspositionCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn last_decision(&self) -> Option<MoveDecision> {
        self.last_decision
    }

    /// Pick a column for the engine's piece, or `None` if the board is full.
    pub fn choose_move(&mut self, board: &Board) -> Option<usize> {
        self.decide(board).map(|d| d.column)
    }

    /// Like [`choose_move`](Self::choose_move) but reports how the column
    /// was chosen.
    pub fn decide(&mut self, board: &Board) -> Option<MoveDecision> {
        let valid = board.valid_moves();
        if valid.is_empty() {
            debug!(engine = %self.name, "no legal move");
            self.last_decision = None;
            return None;
        }

        let decision = if self.rng.random_range(0.0..1.0) < self.mistake_rate {
            let column = valid[self.rng.random_range(0..valid.len())];
            MoveDecision {
                column,
                score: None,
                kind: DecisionKind::Mistake,
            }
        } else {
            // Strictly greater keeps the lowest column on ties.
            let (column, score) = self
                .score_moves(board, &valid)
                .into_iter()
                .fold(None, |best: Option<(usize, Score)>, (col, score)| match best {
                    Some((_, best_score)) if score <= best_score => best,
                    _ => Some((col, score)),
                })?;
            MoveDecision {
                column,
                score: Some(score),
                kind: DecisionKind::Searched,
            }
        };

        debug!(
            engine = %self.name,
            column = decision.column,
            score = ?decision.score,
            kind = ?decision.kind,
            "move chosen"
        );
        self.last_decision = Some(decision);
        Some(decision)
    }

    /// Score every legal move and return the best `top_k`, highest score
    /// first, ties by ascending column. Never takes the mistake branch.
    pub fn ranked_moves(&mut self, board: &Board, top_k: usize) -> Vec<RankedMove> {
        let valid = board.valid_moves();
        let mut ranked: Vec<RankedMove> = self
            .score_moves(board, &valid)
            .into_iter()
            .map(|(column, score)| RankedMove { column, score })
            .collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.column.cmp(&b.column)));
        ranked.truncate(top_k);
        ranked
    }

    /// Root of a search: each candidate is scored with a full window.
    fn score_moves(&mut self, board: &Board, valid: &[usize]) -> Vec<(usize, Score)> {
        self.cache.begin_search();
        self.stats = SearchStats::default();
        let child_depth = self.depth.saturating_sub(1);

        let mut scored = Vec::with_capacity(valid.len());
        for &col in valid {
            let child = play(board, col, self.engine_piece);
            let score = self.minimax(&child, child_depth, NEG_INF, POS_INF, false);
            trace!(column = col, score, "root move scored");
            scored.push((col, score));
        }

        debug!(
            engine = %self.name,
            depth = self.depth,
            nodes = self.stats.nodes,
            cache_hits = self.stats.cache_hits,
            cutoffs = self.stats.cutoffs,
            cache_len = self.cache.len(),
            "search finished"
        );
        scored
    }

    /// Minimax value of `board` with `depth` plies left. `maximizing` is true
    /// when the engine is to move.
    ///
    /// Only exact values are cached: a result that falls outside the
    /// `(alpha, beta)` window it was computed with is a bound and is
    /// returned without being stored.
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> Score {
        self.stats.nodes += 1;
        let key = CacheKey {
            board: board.key(),
            depth,
            maximizing,
        };
        if let Some(score) = self.cache.get(&key) {
            self.stats.cache_hits += 1;
            return score;
        }

        let winner = board.check_win();
        if winner.is_some() || depth == 0 || board.is_full() {
            let score = self.evaluate(board, winner, depth);
            self.cache.insert(key, score);
            return score;
        }

        let (window_low, window_high) = (alpha, beta);
        let value = if maximizing {
            let mut value = NEG_INF;
            for col in board.valid_moves() {
                let child = play(board, col, self.engine_piece);
                value = value.max(self.minimax(&child, depth - 1, alpha, beta, false));
                alpha = alpha.max(value);
                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            value
        } else {
            let mut value = POS_INF;
            for col in board.valid_moves() {
                let child = play(board, col, self.opponent_piece);
                value = value.min(self.minimax(&child, depth - 1, alpha, beta, true));
                beta = beta.min(value);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            value
        };

        if window_low < value && value < window_high {
            self.cache.insert(key, value);
        }
        value
    }

    /// Score a leaf from the engine's point of view.
    pub fn evaluate(&self, board: &Board, winner: Option<Piece>, depth_remaining: u32) -> Score {
        let bonus = Score::try_from(depth_remaining).unwrap_or(Score::MAX);
        match winner {
            Some(piece) if piece == self.engine_piece => WIN_SCORE.saturating_add(bonus),
            Some(_) => (-WIN_SCORE).saturating_sub(bonus),
            None => self.heuristic.evaluate(board, self.engine_piece),
        }
    }

    /// Human-readable account of the last decision.
    pub fn explanation(&self) -> String {
        match self.last_decision {
            None => format!("{} has no legal move", self.name),
            Some(MoveDecision {
                column,
                kind: DecisionKind::Mistake,
                ..
            }) => format!(
                "{} played column {} at random (mistake rate {:.2})",
                self.name, column, self.mistake_rate
            ),
            Some(MoveDecision {
                column,
                score: Some(score),
                ..
            }) if score >= WIN_SCORE => format!(
                "{} plays column {}: forced win found (score {})",
                self.name, column, score
            ),
            Some(MoveDecision {
                column,
                score: Some(score),
                ..
            }) if score <= -WIN_SCORE => format!(
                "{} plays column {}: every line loses, delaying (score {})",
                self.name, column, score
            ),
            Some(MoveDecision { column, score, .. }) => format!(
                "{} plays column {}: best positional score {} at depth {}",
                self.name,
                column,
                score.unwrap_or_default(),
                self.depth
            ),
        }
    }
}

/// Copy of `board` with `piece` dropped in `col`. Callers only pass columns
/// taken from `valid_moves`, so the drop always lands.
fn play(board: &Board, col: usize, piece: Piece) -> Board {
    let mut child = board.clone();
    let dropped = child.drop_piece(col, piece);
    debug_assert!(dropped.is_ok(), "column {col} listed as valid: {dropped:?}");
    child
}

impl Agent for SearchEngine {
    /// Plays `choose_move` for the side to move. The engine must have been
    /// built for that side.
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        if state.is_terminal() {
            return None;
        }
        self.choose_move(state.board())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::heuristic::StreakHeuristic;

    fn engine(piece: Piece, depth: i32) -> SearchEngine {
        SearchEngine::new(EngineConfig {
            piece,
            depth,
            seed: Some(42),
            ..EngineConfig::default()
        })
        .unwrap()
    }

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    /// Plain minimax with no pruning and no cache.
    fn reference_minimax(engine: &SearchEngine, board: &Board, depth: u32, maximizing: bool) -> Score {
        let winner = board.check_win();
        if winner.is_some() || depth == 0 || board.is_full() {
            return engine.evaluate(board, winner, depth);
        }
        let piece = if maximizing {
            engine.piece()
        } else {
            engine.piece().other()
        };
        let scores = board.valid_moves().into_iter().map(|col| {
            let mut child = board.clone();
            child.drop_piece(col, piece).unwrap();
            reference_minimax(engine, &child, depth - 1, !maximizing)
        });
        if maximizing {
            scores.max().unwrap()
        } else {
            scores.min().unwrap()
        }
    }

    fn reference_scores(engine: &SearchEngine, board: &Board) -> Vec<(usize, Score)> {
        board
            .valid_moves()
            .into_iter()
            .map(|col| {
                let mut child = board.clone();
                child.drop_piece(col, engine.piece()).unwrap();
                let depth = engine.depth().saturating_sub(1);
                (col, reference_minimax(engine, &child, depth, false))
            })
            .collect()
    }

    fn reference_best(engine: &SearchEngine, board: &Board) -> Option<usize> {
        let mut best: Option<(usize, Score)> = None;
        for (col, score) in reference_scores(engine, board) {
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((col, score));
            }
        }
        best.map(|(col, _)| col)
    }

    /// Random non-terminal positions reached by alternating drops.
    fn random_positions(width: usize, height: usize, win: usize, count: usize, seed: u64) -> Vec<Board> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = Vec::new();
        while positions.len() < count {
            let mut board = Board::new(width, height, win).unwrap();
            let mut piece = Piece::X;
            let plies = rng.random_range(0..width * height / 2);
            for _ in 0..plies {
                let moves = board.valid_moves();
                let col = moves[rng.random_range(0..moves.len())];
                board.drop_piece(col, piece).unwrap();
                piece = piece.other();
                if board.check_win().is_some() {
                    break;
                }
            }
            if board.check_win().is_none() && !board.is_full() {
                positions.push(board);
            }
        }
        positions
    }

    #[test]
    fn config_rejects_negative_depth() {
        let config = EngineConfig {
            depth: -1,
            ..EngineConfig::default()
        };
        assert!(matches!(
            SearchEngine::new(config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn config_rejects_out_of_range_mistake_rate() {
        for rate in [-0.1, 1.5, f64::NAN] {
            let config = EngineConfig {
                mistake_rate: rate,
                ..EngineConfig::default()
            };
            assert!(SearchEngine::new(config).is_err(), "rate {rate} accepted");
        }
        for rate in [0.0, 1.0] {
            let config = EngineConfig {
                mistake_rate: rate,
                ..EngineConfig::default()
            };
            assert!(SearchEngine::new(config).is_ok());
        }
    }

    #[test]
    fn full_board_yields_no_move() {
        let mut board = Board::new(2, 1, 2).unwrap();
        board.drop_piece(0, Piece::X).unwrap();
        board.drop_piece(1, Piece::O).unwrap();
        let mut engine = engine(Piece::O, 4);
        assert_eq!(engine.choose_move(&board), None);
        assert!(engine.ranked_moves(&board, 3).is_empty());
        assert_eq!(engine.explanation(), "AI has no legal move");
    }

    #[test]
    fn evaluate_prefers_faster_wins() {
        let engine = engine(Piece::O, 4);
        let board = Board::standard();
        assert_eq!(engine.evaluate(&board, Some(Piece::O), 3), 1003);
        assert_eq!(engine.evaluate(&board, Some(Piece::O), 0), 1000);
        assert_eq!(engine.evaluate(&board, Some(Piece::X), 3), -1003);
        assert_eq!(engine.evaluate(&board, None, 3), 0);
    }

    #[test]
    fn search_does_not_mutate_caller_board() {
        let mut board = Board::standard();
        board.drop_piece(3, Piece::X).unwrap();
        let before = board.clone();
        let mut engine = engine(Piece::O, 4);
        engine.choose_move(&board);
        engine.ranked_moves(&board, 7);
        assert_eq!(board, before);
    }

    #[test]
    fn takes_winning_move() {
        let board = board(
            "
            _______
            _______
            _______
            ______O
            ___X__O
            _XXX__O
            ",
        );
        let mut engine = engine(Piece::O, 4);
        assert_eq!(engine.choose_move(&board), Some(6));
        let decision = engine.last_decision().unwrap();
        assert_eq!(decision.kind, DecisionKind::Searched);
        assert_eq!(decision.score, Some(1003));
        assert!(engine.explanation().contains("forced win"));
    }

    #[test]
    fn blocks_opponent_win() {
        // X threatens column 4 on the bottom row; column 0 is already O.
        let board = board(
            "
            _______
            _______
            _______
            _______
            _______
            OXXX__O
            ",
        );
        for depth in [2, 4, 5] {
            let mut engine = engine(Piece::O, depth);
            assert_eq!(engine.choose_move(&board), Some(4), "depth {depth}");
        }
    }

    #[test]
    fn open_three_is_lost_and_ties_go_to_lowest_column() {
        // Both ends of X's three are open: O cannot stop the win, so every
        // move scores the same loss and the tie-break picks column 0.
        let board = board(
            "
            _______
            _______
            _______
            _______
            _______
            _XXX___
            ",
        );
        for (depth, loss) in [(4, -1002), (5, -1003)] {
            let mut engine = engine(Piece::O, depth);
            let ranked = engine.ranked_moves(&board, 7);
            assert_eq!(ranked.len(), 7);
            assert!(ranked.iter().all(|m| m.score == loss), "depth {depth}: {ranked:?}");
            assert_eq!(engine.choose_move(&board), Some(0), "depth {depth}");
            assert!(engine.explanation().contains("every line loses"));
        }
    }

    #[test]
    fn prefers_win_over_block() {
        let board = board(
            "
            _______
            _______
            _______
            ______O
            ______O
            OXXX__O
            ",
        );
        let mut engine = engine(Piece::O, 4);
        assert_eq!(engine.choose_move(&board), Some(6));
    }

    #[test]
    fn depth_zero_scores_candidates_statically() {
        let mut engine = engine(Piece::X, 0);
        assert_eq!(engine.choose_move(&Board::standard()), Some(3));
    }

    #[test]
    fn ties_keep_lowest_column() {
        // With nothing in the center column every move scores 0 except 3.
        let mut engine = engine(Piece::X, 1);
        let ranked = engine.ranked_moves(&Board::standard(), 7);
        let columns: Vec<usize> = ranked.iter().map(|m| m.column).collect();
        assert_eq!(columns, vec![3, 0, 1, 2, 4, 5, 6]);
        assert_eq!(ranked[0].score, 5);
        assert!(ranked[1..].iter().all(|m| m.score == 0));

        // Fill the center column of a 3-wide board so every remaining move
        // ties.
        let mut board = Board::new(3, 3, 3).unwrap();
        board.drop_piece(1, Piece::O).unwrap();
        board.drop_piece(1, Piece::O).unwrap();
        board.drop_piece(1, Piece::X).unwrap();
        let mut engine = SearchEngine::new(EngineConfig {
            piece: Piece::X,
            depth: 1,
            ..EngineConfig::default()
        })
        .unwrap();
        assert_eq!(engine.choose_move(&board), Some(0));
    }

    #[test]
    fn ranked_moves_top_k() {
        // Columns 0..=2 full with no winner: four moves remain.
        let board = board(
            "
            OXO____
            XOX____
            OXO____
            XOX____
            OXO____
            XOX____
            ",
        );
        assert_eq!(board.check_win(), None);
        let valid = board.valid_moves();
        assert_eq!(valid, vec![3, 4, 5, 6]);

        let mut engine = engine(Piece::O, 2);
        let ranked = engine.ranked_moves(&board, 3);
        assert_eq!(ranked.len(), 3);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(ranked.iter().all(|m| valid.contains(&m.column)));
        assert_eq!(Some(ranked[0].column), engine.choose_move(&board));
    }

    #[test]
    fn ranked_moves_ignore_mistake_rate() {
        let board = board(
            "
            _______
            _______
            _______
            _______
            ___O___
            __XXX__
            ",
        );
        let mut careful = engine(Piece::O, 3);
        let mut sloppy = SearchEngine::new(EngineConfig {
            piece: Piece::O,
            depth: 3,
            mistake_rate: 1.0,
            seed: Some(1),
            ..EngineConfig::default()
        })
        .unwrap();
        assert_eq!(careful.ranked_moves(&board, 7), sloppy.ranked_moves(&board, 7));
    }

    #[test]
    fn alpha_beta_matches_unpruned_minimax() {
        let mut small = engine(Piece::X, 4);
        for board in random_positions(5, 4, 3, 40, 3) {
            assert_eq!(small.choose_move(&board), reference_best(&small, &board), "\n{board}");
        }

        let mut standard = engine(Piece::O, 3);
        for board in random_positions(7, 6, 4, 25, 9) {
            let mut expected = reference_scores(&standard, &board);
            expected.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            let ranked: Vec<(usize, Score)> = standard
                .ranked_moves(&board, usize::MAX)
                .into_iter()
                .map(|m| (m.column, m.score))
                .collect();
            assert_eq!(ranked, expected, "\n{board}");
            assert_eq!(standard.choose_move(&board), reference_best(&standard, &board));
        }
    }

    #[test]
    fn alpha_beta_matches_unpruned_minimax_with_streak_heuristic() {
        let mut engine = engine(Piece::O, 3).with_heuristic(Box::new(StreakHeuristic));
        for board in random_positions(6, 5, 4, 20, 21) {
            assert_eq!(engine.choose_move(&board), reference_best(&engine, &board), "\n{board}");
        }
    }

    #[test]
    fn deterministic_with_fixed_seed() {
        let positions = random_positions(7, 6, 4, 10, 5);
        let mut a = engine(Piece::X, 4);
        let mut b = engine(Piece::X, 4);
        for board in &positions {
            let first = a.choose_move(board);
            assert_eq!(first, a.choose_move(board));
            assert_eq!(first, b.choose_move(board));
        }

        // Same seed, same mistakes.
        let config = EngineConfig {
            mistake_rate: 0.5,
            seed: Some(99),
            ..EngineConfig::default()
        };
        let mut a = SearchEngine::new(config.clone()).unwrap();
        let mut b = SearchEngine::new(config).unwrap();
        for board in &positions {
            assert_eq!(a.decide(board), b.decide(board));
        }
    }

    #[test]
    fn mistake_rate_one_always_plays_random_legal_move() {
        let board = board(
            "
            X__O___
            O__X___
            X__O___
            O__X___
            X__O___
            O__X___
            ",
        );
        let valid = board.valid_moves();
        let mut engine = SearchEngine::new(EngineConfig {
            mistake_rate: 1.0,
            ..EngineConfig::default()
        })
        .unwrap()
        .with_rng(StdRng::seed_from_u64(8));

        let mut seen = vec![0usize; board.width()];
        for _ in 0..500 {
            let decision = engine.decide(&board).unwrap();
            assert_eq!(decision.kind, DecisionKind::Mistake);
            assert!(valid.contains(&decision.column));
            seen[decision.column] += 1;
        }
        // Every legal column shows up; no full column ever does.
        for col in 0..board.width() {
            assert_eq!(seen[col] > 0, valid.contains(&col), "column {col}");
        }
        assert_eq!(engine.stats().nodes, 0);
        assert!(engine.explanation().contains("at random"));
    }

    #[test]
    fn mistake_rate_zero_never_plays_random_move() {
        let mut engine = engine(Piece::O, 2);
        for board in random_positions(7, 6, 4, 30, 13) {
            let decision = engine.decide(&board).unwrap();
            assert_eq!(decision.kind, DecisionKind::Searched);
            assert_eq!(Some(decision.column), reference_best(&engine, &board));
        }
    }

    #[test]
    fn session_cache_is_reused_across_calls() {
        let mut board = Board::standard();
        board.drop_piece(3, Piece::X).unwrap();
        let mut engine = engine(Piece::O, 4);

        let first = engine.choose_move(&board);
        let cold = engine.stats();
        assert!(!engine.cache().is_empty());

        let second = engine.choose_move(&board);
        let warm = engine.stats();
        assert_eq!(first, second);
        assert!(warm.cache_hits > 0);
        assert!(warm.nodes < cold.nodes);
    }

    #[test]
    fn per_search_cache_starts_empty_each_call() {
        let mut board = Board::standard();
        board.drop_piece(3, Piece::X).unwrap();
        let mut engine = SearchEngine::new(EngineConfig {
            depth: 3,
            cache_scope: CacheScope::PerSearch,
            ..EngineConfig::default()
        })
        .unwrap();
        engine.choose_move(&board);
        let first = engine.stats();
        let len = engine.cache().len();
        engine.choose_move(&board);
        assert_eq!(engine.stats(), first);
        assert_eq!(engine.cache().len(), len);
    }

    #[test]
    fn capped_cache_still_searches_correctly() {
        let mut capped = SearchEngine::new(EngineConfig {
            piece: Piece::X,
            depth: 4,
            cache_max_entries: Some(16),
            ..EngineConfig::default()
        })
        .unwrap();
        for board in random_positions(5, 4, 3, 15, 17) {
            assert_eq!(capped.choose_move(&board), reference_best(&capped, &board));
        }
        assert!(capped.cache().len() <= 16);
    }

    #[test]
    fn agent_plays_side_to_move() {
        let mut state = GameState::initial();
        let mut x = engine(Piece::X, 3);
        let mut o = engine(Piece::O, 3);
        while !state.is_terminal() {
            let agent: &mut dyn Agent = if state.current_player() == Piece::X {
                &mut x
            } else {
                &mut o
            };
            let col = agent.select_action(&state).unwrap();
            state = state.apply_move(col).unwrap();
        }
        assert!(state.outcome().is_some());
        assert_eq!(x.select_action(&state), None);
        assert_eq!(Agent::name(&x), "AI");
    }
}
