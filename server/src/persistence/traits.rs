//! Async storage trait for the score relation.
//!
//! The relation is a plain bag of `(game, player, value)` rows. Uniqueness per
//! `(game, player)` is a leaderboard invariant, not a storage constraint, so
//! `insert` never rejects duplicates and `find` may return several rows.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so that
//! service futures stay `Send` and can be handed to `tokio::spawn`.

use super::{PersistenceError, ScoreRecord, UpsertOutcome};
use std::future::Future;

pub trait ScoreStore: Send + Sync {
    /// All rows for `(game, player)`, in arrival order.
    fn find(
        &self,
        game: &str,
        player: &str,
    ) -> impl Future<Output = Result<Vec<ScoreRecord>, PersistenceError>> + Send;

    /// Append a row unconditionally.
    fn insert(
        &self,
        record: &ScoreRecord,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Remove every row for `(game, player)` and return how many were removed.
    fn delete_where(
        &self,
        game: &str,
        player: &str,
    ) -> impl Future<Output = Result<u64, PersistenceError>> + Send;

    /// At most `n` rows of `game`, by value descending, ties in arrival order.
    fn top_n(
        &self,
        game: &str,
        n: u32,
    ) -> impl Future<Output = Result<Vec<ScoreRecord>, PersistenceError>> + Send;

    /// Atomically replace the rows for the record's key when `record.value` is
    /// strictly greater than all of them, or insert it when there are none.
    ///
    /// Implementations must make the compare and the write indivisible with
    /// respect to concurrent calls on the same store.
    fn upsert_if_greater(
        &self,
        record: &ScoreRecord,
    ) -> impl Future<Output = Result<UpsertOutcome, PersistenceError>> + Send;
}
