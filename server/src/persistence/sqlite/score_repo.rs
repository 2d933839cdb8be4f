//! SQLite implementation of [`ScoreStore`].

use sqlx::SqlitePool;

use crate::persistence::traits::ScoreStore;
use crate::persistence::{PersistenceError, ScoreRecord, UpsertOutcome};

/// Row type for score queries, mapped via `sqlx::FromRow`.
#[derive(sqlx::FromRow)]
struct ScoreRow {
    game: String,
    player: String,
    value: i64,
    submitted_at: i64,
}

impl From<ScoreRow> for ScoreRecord {
    fn from(r: ScoreRow) -> Self {
        Self {
            game: r.game,
            player: r.player,
            value: r.value as u64,
            submitted_at: r.submitted_at as u64,
        }
    }
}

fn sql_value(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub struct SqliteScoreStore {
    pool: SqlitePool,
}

impl SqliteScoreStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ScoreStore for SqliteScoreStore {
    async fn find(&self, game: &str, player: &str) -> Result<Vec<ScoreRecord>, PersistenceError> {
        let rows: Vec<ScoreRow> = sqlx::query_as(
            r#"
            SELECT game, player, value, submitted_at
            FROM scores
            WHERE game = ? AND player = ?
            ORDER BY id ASC
            "#,
        )
        .bind(game)
        .bind(player)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ScoreRecord::from).collect())
    }

    async fn insert(&self, record: &ScoreRecord) -> Result<(), PersistenceError> {
        sqlx::query("INSERT INTO scores (game, player, value, submitted_at) VALUES (?, ?, ?, ?)")
            .bind(&record.game)
            .bind(&record.player)
            .bind(sql_value(record.value))
            .bind(record.submitted_at as i64)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_where(&self, game: &str, player: &str) -> Result<u64, PersistenceError> {
        let result = sqlx::query("DELETE FROM scores WHERE game = ? AND player = ?")
            .bind(game)
            .bind(player)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn top_n(&self, game: &str, n: u32) -> Result<Vec<ScoreRecord>, PersistenceError> {
        let rows: Vec<ScoreRow> = sqlx::query_as(
            r#"
            SELECT game, player, value, submitted_at
            FROM scores
            WHERE game = ?
            ORDER BY value DESC, id ASC
            LIMIT ?
            "#,
        )
        .bind(game)
        .bind(i64::from(n))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ScoreRecord::from).collect())
    }

    async fn upsert_if_greater(&self, record: &ScoreRecord) -> Result<UpsertOutcome, PersistenceError> {
        let value = sql_value(record.value);
        let mut tx = self.pool.begin().await?;

        // Must stay the first statement: it takes the write lock.
        let displaced: Vec<(i64,)> = sqlx::query_as(
            r#"
            DELETE FROM scores
            WHERE game = ?1 AND player = ?2
              AND ?3 > (SELECT MAX(value) FROM scores WHERE game = ?1 AND player = ?2)
            RETURNING value
            "#,
        )
        .bind(&record.game)
        .bind(&record.player)
        .bind(value)
        .fetch_all(&mut *tx)
        .await?;

        let outcome = match displaced.iter().map(|(v,)| *v).max() {
            Some(previous) => UpsertOutcome::Replaced {
                previous: previous as u64,
            },
            None => {
                let existing: Option<i64> = sqlx::query_scalar(
                    "SELECT MAX(value) FROM scores WHERE game = ? AND player = ?",
                )
                .bind(&record.game)
                .bind(&record.player)
                .fetch_one(&mut *tx)
                .await?;

                if let Some(existing) = existing {
                    tx.rollback().await?;
                    return Ok(UpsertOutcome::Kept {
                        existing: existing as u64,
                    });
                }
                UpsertOutcome::Inserted
            }
        };

        sqlx::query("INSERT INTO scores (game, player, value, submitted_at) VALUES (?, ?, ?, ?)")
            .bind(&record.game)
            .bind(&record.player)
            .bind(value)
            .bind(record.submitted_at as i64)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(outcome)
    }
}
