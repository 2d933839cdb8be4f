pub mod legacy;
pub mod memory;
pub mod sqlite;
pub mod traits;

pub use legacy::{load_legacy_export, LegacyScoreRow};
pub use memory::MemoryScoreStore;
pub use traits::ScoreStore;

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// One row of the score relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub game: String,
    pub player: String,
    /// Stored (polarity-transformed) value; always ranked descending.
    pub value: u64,
    pub submitted_at: u64,
}

impl ScoreRecord {
    pub fn new(game: impl Into<String>, player: impl Into<String>, value: u64) -> Self {
        Self {
            game: game.into(),
            player: player.into(),
            value,
            submitted_at: now_timestamp(),
        }
    }
}

/// Result of [`ScoreStore::upsert_if_greater`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No row existed for the key; the record was inserted.
    Inserted,
    /// Every existing row was below the new value and has been replaced.
    Replaced { previous: u64 },
    /// An existing row is at least as good; nothing was written.
    Kept { existing: u64 },
}

impl UpsertOutcome {
    pub fn is_new_best(self) -> bool {
        !matches!(self, Self::Kept { .. })
    }
}

/// Get the current unix timestamp in seconds.
pub fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
