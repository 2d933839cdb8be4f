//! In-process implementation of [`ScoreStore`].
//!
//! Rows live in a `Vec` in arrival order, guarded by a single mutex. Every
//! operation, including `upsert_if_greater`, runs under one lock acquisition.

use std::sync::{Mutex, MutexGuard};

use super::traits::ScoreStore;
use super::{PersistenceError, ScoreRecord, UpsertOutcome};

#[derive(Default)]
pub struct MemoryScoreStore {
    rows: Mutex<Vec<ScoreRecord>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> Result<MutexGuard<'_, Vec<ScoreRecord>>, PersistenceError> {
        self.rows
            .lock()
            .map_err(|_| PersistenceError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn matches_key(row: &ScoreRecord, game: &str, player: &str) -> bool {
    row.game == game && row.player == player
}

impl ScoreStore for MemoryScoreStore {
    async fn find(&self, game: &str, player: &str) -> Result<Vec<ScoreRecord>, PersistenceError> {
        let rows = self.rows()?;
        Ok(rows
            .iter()
            .filter(|r| matches_key(r, game, player))
            .cloned()
            .collect())
    }

    async fn insert(&self, record: &ScoreRecord) -> Result<(), PersistenceError> {
        self.rows()?.push(record.clone());
        Ok(())
    }

    async fn delete_where(&self, game: &str, player: &str) -> Result<u64, PersistenceError> {
        let mut rows = self.rows()?;
        let before = rows.len();
        rows.retain(|r| !matches_key(r, game, player));
        Ok((before - rows.len()) as u64)
    }

    async fn top_n(&self, game: &str, n: u32) -> Result<Vec<ScoreRecord>, PersistenceError> {
        let rows = self.rows()?;
        let mut ranked: Vec<ScoreRecord> = rows.iter().filter(|r| r.game == game).cloned().collect();
        // Stable sort keeps arrival order among equal values.
        ranked.sort_by(|a, b| b.value.cmp(&a.value));
        ranked.truncate(n as usize);
        Ok(ranked)
    }

    async fn upsert_if_greater(&self, record: &ScoreRecord) -> Result<UpsertOutcome, PersistenceError> {
        let mut rows = self.rows()?;
        let best = rows
            .iter()
            .filter(|r| matches_key(r, &record.game, &record.player))
            .map(|r| r.value)
            .max();

        let outcome = match best {
            None => UpsertOutcome::Inserted,
            Some(existing) if record.value <= existing => {
                return Ok(UpsertOutcome::Kept { existing });
            }
            Some(previous) => {
                rows.retain(|r| !matches_key(r, &record.game, &record.player));
                UpsertOutcome::Replaced { previous }
            }
        };
        rows.push(record.clone());
        Ok(outcome)
    }
}
