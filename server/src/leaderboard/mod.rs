//! Best-score leaderboard service.
//!
//! Keeps, per `(game, player)`, the single best score ever submitted. The
//! service holds no state of its own between calls: everything lives in the
//! injected [`ScoreStore`], and the compare-and-replace on submit is delegated
//! to the store's atomic [`ScoreStore::upsert_if_greater`].

mod types;

pub use types::{
    ClampedScore, DeleteResponse, ImportReport, Leaderboards, PersonalBest, RankedEntry,
    SubmitResponse, Submission,
};

use futures::future::join_all;
use scoring::{
    sanitize_stored, storage_ceiling, validate_limit, GameCatalog, GameSpec, InputError,
    PlayerName, RawScore,
};
use std::sync::Arc;

use crate::persistence::{
    LegacyScoreRow, PersistenceError, ScoreRecord, ScoreStore, UpsertOutcome,
};

/// Page width of [`LeaderboardService::query`] when the caller has no preference.
pub const DEFAULT_QUERY_LIMIT: u32 = 10;

/// Per-game page width of [`LeaderboardService::query_all`] by default.
pub const DEFAULT_OVERVIEW_LIMIT: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] PersistenceError),
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
}

pub struct LeaderboardService<S> {
    store: S,
    catalog: Arc<GameCatalog>,
}

impl<S: ScoreStore> LeaderboardService<S> {
    pub fn new(store: S, catalog: Arc<GameCatalog>) -> Self {
        Self { store, catalog }
    }

    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a score, keeping it only if it beats the player's stored best.
    pub async fn submit(
        &self,
        game: &str,
        player: &str,
        raw_score: f64,
    ) -> Result<Submission, LeaderboardError> {
        let spec = self.catalog.resolve(game)?;
        let player = PlayerName::parse(player)?;
        let raw = RawScore::new(raw_score)?;

        let encoded = spec.encode(raw.get());
        let clamped = encoded.clamped.then(|| ClampedScore {
            raw: raw.get(),
            ceiling: storage_ceiling(spec.polarity),
        });
        if let Some(notice) = &clamped {
            tracing::warn!(
                game = %spec.id,
                player = %player,
                raw = notice.raw,
                ceiling = notice.ceiling,
                "Score outside storable range, clamping"
            );
        }

        let record = ScoreRecord::new(&spec.id, player.as_str(), encoded.value);
        let outcome = self
            .store
            .upsert_if_greater(&record)
            .await
            .inspect_err(|e| tracing::error!(game = %spec.id, player = %player, error = %e, "Submit failed"))?;

        tracing::info!(
            game = %spec.id,
            player = %player,
            stored = encoded.value,
            ?outcome,
            "Score submitted"
        );

        let previous_best = match outcome {
            UpsertOutcome::Inserted => None,
            UpsertOutcome::Replaced { previous } => Some(previous),
            UpsertOutcome::Kept { existing } => Some(existing),
        };

        Ok(Submission {
            is_new_best: outcome.is_new_best(),
            stored_value: encoded.value,
            display_score: spec.display(encoded.value),
            previous_best,
            clamped,
        })
    }

    /// Top `limit` players of `game`, ranked from 1. An empty list means no
    /// scores yet.
    pub async fn query(&self, game: &str, limit: u32) -> Result<Vec<RankedEntry>, LeaderboardError> {
        let spec = self.catalog.resolve(game)?;
        let limit = validate_limit(limit)?;
        tracing::debug!(game = %spec.id, limit, "Query leaderboard");

        let rows = self
            .store
            .top_n(&spec.id, limit)
            .await
            .inspect_err(|e| tracing::error!(game = %spec.id, error = %e, "Query failed"))?;

        Ok(rank_rows(spec, rows))
    }

    /// Query several games concurrently. A game whose lookup fails is left out
    /// of the result instead of failing the whole call.
    pub async fn query_games<'a, I>(
        &self,
        games: I,
        per_game_limit: u32,
    ) -> Result<Leaderboards, LeaderboardError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        validate_limit(per_game_limit)?;

        let lookups = games
            .into_iter()
            .map(|game| async move { (game, self.query(game, per_game_limit).await) });

        let mut boards = Leaderboards::new();
        for (game, result) in join_all(lookups).await {
            match result {
                Ok(entries) => {
                    boards.insert(game.to_string(), entries);
                }
                Err(e) => tracing::warn!(game, error = %e, "Leaving game out of overview"),
            }
        }
        Ok(boards)
    }

    /// [`query_games`](Self::query_games) over the whole catalog.
    pub async fn query_all(&self, per_game_limit: u32) -> Result<Leaderboards, LeaderboardError> {
        let games = self.catalog.games().iter().map(|g| g.id.as_str());
        self.query_games(games, per_game_limit).await
    }

    /// The player's stored best for `game`, if any. Tolerates duplicate rows
    /// left behind by older writers by taking the best of the set.
    pub async fn best_for(
        &self,
        game: &str,
        player: &str,
    ) -> Result<Option<PersonalBest>, LeaderboardError> {
        let spec = self.catalog.resolve(game)?;
        let player = PlayerName::parse(player)?;

        let rows = self.store.find(&spec.id, player.as_str()).await?;
        Ok(rows
            .into_iter()
            .max_by_key(|r| r.value)
            .map(|best| PersonalBest {
                display_score: spec.display(best.value),
                raw_stored_value: best.value,
                player: best.player,
            }))
    }

    /// Remove every record of `player` in `game`. Deleting a key with no
    /// records succeeds and returns 0.
    pub async fn delete_player(&self, game: &str, player: &str) -> Result<u64, LeaderboardError> {
        let spec = self.catalog.resolve(game)?;
        let player = PlayerName::parse(player)?;

        let removed = self
            .store
            .delete_where(&spec.id, player.as_str())
            .await
            .inspect_err(|e| tracing::error!(game = %spec.id, player = %player, error = %e, "Delete failed"))?;

        tracing::info!(game = %spec.id, player = %player, removed, "Deleted player");
        Ok(removed)
    }

    /// Import rows exported from the hosted table. Scores are taken as stored
    /// values and go through the same best-score-wins primitive as submissions,
    /// so running an import twice changes nothing.
    pub async fn import_legacy(
        &self,
        rows: &[LegacyScoreRow],
    ) -> Result<ImportReport, LeaderboardError> {
        let mut report = ImportReport::default();

        for row in rows {
            let Some(spec) = self.catalog.get(&row.game_name) else {
                tracing::warn!(game = %row.game_name, "Skipping row for unknown game");
                report.skipped += 1;
                continue;
            };
            let player = match PlayerName::parse(&row.player_name) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(game = %spec.id, error = %e, "Skipping row with invalid player");
                    report.skipped += 1;
                    continue;
                }
            };
            if let Err(e) = RawScore::new(row.score) {
                tracing::warn!(game = %spec.id, player = %player, error = %e, "Skipping row with invalid score");
                report.skipped += 1;
                continue;
            }

            let stored = sanitize_stored(spec.polarity, row.score);
            if stored.clamped {
                report.clamped += 1;
            }

            let record = ScoreRecord::new(&spec.id, player.as_str(), stored.value);
            match self.store.upsert_if_greater(&record).await? {
                UpsertOutcome::Inserted => report.inserted += 1,
                UpsertOutcome::Replaced { .. } => report.replaced += 1,
                UpsertOutcome::Kept { .. } => report.kept += 1,
            }
        }

        tracing::info!(?report, "Legacy import finished");
        Ok(report)
    }
}

fn rank_rows(spec: &GameSpec, rows: Vec<ScoreRecord>) -> Vec<RankedEntry> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| RankedEntry {
            rank: idx as u32 + 1,
            display_score: spec.display(row.value),
            raw_stored_value: row.value,
            player: row.player,
        })
        .collect()
}
