//! SQLite-backed score store.
//!
//! ## Database setup
//!
//! [`Database`] wraps a `sqlx::SqlitePool` configured with:
//! - **WAL mode**: one writer and multiple concurrent readers.
//! - **Embedded migrations**: `sqlx::migrate!` runs `migrations/001_initial_schema.sql`
//!   automatically when [`Database::open`] is called. The schema is idempotent.
//!
//! ## Repository
//!
//! [`SqliteScoreStore`] holds a `SqlitePool` and implements
//! [`ScoreStore`](crate::persistence::ScoreStore). Scores are stored as
//! `INTEGER`; every storable value is at most `2^53 - 1`, well inside `i64`.
//!
//! `upsert_if_greater` runs in one transaction whose first statement is a
//! write, so SQLite takes the write lock before the current best is read.

mod database;
mod score_repo;
#[cfg(test)]
mod integration_tests;

pub use database::Database;
pub use score_repo::SqliteScoreStore;
