//! Database models

use serde::{Deserialize, Serialize};

use crate::session::GameSession;

/// A session together with the bookkeeping owned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredGame {
    pub session: GameSession,
    /// Bumped on every save; used for optimistic concurrency checks.
    pub version: u64,
    pub created_at: u64,
    pub updated_at: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub total_games: u32,
    pub in_progress: u32,
    pub finished: u32,
    pub red_wins: u32,
    pub black_wins: u32,
}
