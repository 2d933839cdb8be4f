//! Outcome types returned by the leaderboard service, and the JSON shapes
//! handed to presentation clients.

use serde::Serialize;
use std::collections::BTreeMap;

use super::LeaderboardError;

/// Non-fatal notice: the submitted value exceeded the storable range and was
/// capped before storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClampedScore {
    pub raw: f64,
    pub ceiling: u64,
}

/// A submission the store accepted (whether or not it became the new best).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub is_new_best: bool,
    pub stored_value: u64,
    pub display_score: String,
    /// Best stored value for the key before this submission, if any.
    pub previous_best: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clamped: Option<ClampedScore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    /// 1-based position in the ranking.
    pub rank: u32,
    pub player: String,
    pub display_score: String,
    pub raw_stored_value: u64,
}

pub type Leaderboards = BTreeMap<String, Vec<RankedEntry>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalBest {
    pub player: String,
    pub display_score: String,
    pub raw_stored_value: u64,
}

/// Counts from a legacy export import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub inserted: u64,
    pub replaced: u64,
    pub kept: u64,
    pub skipped: u64,
    pub clamped: u64,
}

/// `{accepted, isNewBest, error?}` as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub accepted: bool,
    pub is_new_best: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Result<Submission, LeaderboardError>> for SubmitResponse {
    fn from(result: &Result<Submission, LeaderboardError>) -> Self {
        match result {
            Ok(s) => Self {
                accepted: true,
                is_new_best: s.is_new_best,
                error: None,
            },
            Err(e) => Self {
                accepted: false,
                is_new_best: false,
                error: Some(e.to_string()),
            },
        }
    }
}

/// `{success, error?}` as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<&Result<T, LeaderboardError>> for DeleteResponse {
    fn from(result: &Result<T, LeaderboardError>) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                error: None,
            },
            Err(e) => Self {
                success: false,
                error: Some(e.to_string()),
            },
        }
    }
}
