//! Reader for score exports from the hosted `leaderboards` table.
//!
//! The export is a JSON array of rows. `score` is already in stored form
//! (timed games hold `INVERT_BASE - t`), so rows are imported without a
//! polarity transform. Extra columns such as `id` or `created_at` are ignored.

use serde::Deserialize;
use std::path::Path;

use super::PersistenceError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyScoreRow {
    pub game_name: String,
    pub player_name: String,
    pub score: f64,
}

pub fn load_legacy_export(path: &Path) -> Result<Vec<LegacyScoreRow>, PersistenceError> {
    let contents = std::fs::read_to_string(path)?;
    let rows: Vec<LegacyScoreRow> = serde_json::from_str(&contents)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Loaded legacy score export");
    Ok(rows)
}
