//! Move selection: the agent interface, a random baseline, and the
//! alpha-beta search engine with its heuristics and transposition cache.

mod agent;
pub mod cache;
pub mod engine;
pub mod heuristic;
mod random;

pub use agent::Agent;
pub use cache::{CacheScope, TranspositionCache};
pub use engine::{
    DecisionKind, EngineConfig, MoveDecision, RankedMove, Score, SearchEngine, SearchStats,
    WIN_SCORE,
};
pub use heuristic::{CenterColumnHeuristic, Heuristic, HeuristicKind, StreakHeuristic};
pub use random::RandomAgent;
