//! Best-score leaderboard server: the service, its storage backends and
//! configuration. The `leaderboard` binary is a thin CLI over this crate.

pub mod config;
pub mod leaderboard;
pub mod persistence;

pub use leaderboard::{LeaderboardError, LeaderboardService};
pub use persistence::sqlite::{Database, SqliteScoreStore};
pub use persistence::{MemoryScoreStore, ScoreStore};
