use std::collections::HashMap;

use crate::game::BoardKey;

/// How long transposition entries live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheScope {
    /// Entries persist for the engine's lifetime.
    #[default]
    Session,
    /// The cache is emptied at the start of every top-level search.
    PerSearch,
}

/// (board encoding, remaining depth, maximizing)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub board: BoardKey,
    pub depth: u32,
    pub maximizing: bool,
}

/// Append-only memo of exact minimax values.
///
/// Once a key is stored its value never changes. With `max_entries` set, the
/// cache stops accepting new keys when full instead of evicting.
#[derive(Debug, Clone, Default)]
pub struct TranspositionCache {
    entries: HashMap<CacheKey, i32>,
    scope: CacheScope,
    max_entries: Option<usize>,
}

impl TranspositionCache {
    pub fn new(scope: CacheScope, max_entries: Option<usize>) -> Self {
        TranspositionCache {
            entries: HashMap::new(),
            scope,
            max_entries,
        }
    }

    pub fn scope(&self) -> CacheScope {
        self.scope
    }

    pub fn get(&self, key: &CacheKey) -> Option<i32> {
        self.entries.get(key).copied()
    }

    /// Store a value. Returns false if the key was not stored because the
    /// cache is full. Existing keys keep their first value.
    pub fn insert(&mut self, key: CacheKey, score: i32) -> bool {
        if self.entries.contains_key(&key) {
            return true;
        }
        if self.max_entries.is_some_and(|max| self.entries.len() >= max) {
            return false;
        }
        self.entries.insert(key, score);
        true
    }

    /// Called before each top-level search.
    pub fn begin_search(&mut self) {
        if self.scope == CacheScope::PerSearch {
            self.entries.clear();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
