//! Validated submission inputs.

use std::fmt;

/// Longest accepted player name, in characters.
pub const MAX_PLAYER_NAME_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("unknown game: {0}")]
    UnknownGame(String),
    #[error("player name must not be empty")]
    EmptyPlayerName,
    #[error("player name has {len} characters, at most {max} allowed")]
    PlayerNameTooLong { len: usize, max: usize },
    #[error("score must not be negative (got {0})")]
    NegativeScore(f64),
    #[error("score is not a number")]
    NonNumericScore,
    #[error("limit must be at least 1")]
    ZeroLimit,
}

/// A display name as typed by a player. Not an identity: two players using
/// the same name share one leaderboard slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    /// Trim surrounding whitespace and check the length bounds.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if len == 0 {
            return Err(InputError::EmptyPlayerName);
        }
        if len > MAX_PLAYER_NAME_LEN {
            return Err(InputError::PlayerNameTooLong {
                len,
                max: MAX_PLAYER_NAME_LEN,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A submitted score before any polarity transform. Non-negative, not NaN;
/// may still exceed the storable ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawScore(f64);

impl RawScore {
    pub fn new(value: f64) -> Result<Self, InputError> {
        if value.is_nan() {
            return Err(InputError::NonNumericScore);
        }
        if value < 0.0 {
            return Err(InputError::NegativeScore(value));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// Validate a requested page width. Any positive width is honoured; the
/// store returns fewer rows when the game has fewer records.
pub fn validate_limit(limit: u32) -> Result<u32, InputError> {
    if limit == 0 {
        return Err(InputError::ZeroLimit);
    }
    Ok(limit)
}
