//! The fixed set of games a leaderboard serves.
//!
//! A catalog is built once at startup (from the built-in defaults or a JSON
//! file) and is read-only afterwards. Each entry declares how its scores are
//! ranked and rendered.

use serde::{Deserialize, Serialize};

use crate::codec::{self, Sanitized};
use crate::input::InputError;

/// Whether larger or smaller raw values mean a better result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Polarity {
    #[default]
    HigherIsBetter,
    /// Timed challenges: the raw value is an elapsed duration in seconds.
    LowerIsBetter,
}

impl Polarity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HigherIsBetter => "higher-is-better",
            Self::LowerIsBetter => "lower-is-better",
        }
    }
}

/// How a higher-is-better score is rendered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreFormat {
    /// Magnitude suffixes (`1.50K`, `2.00B`, ...).
    #[default]
    Compact,
    /// Thousands-separated integer (`1,234,567`).
    Grouped,
}

impl ScoreFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Grouped => "grouped",
        }
    }
}

/// One game in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSpec {
    pub id: String,
    #[serde(default)]
    pub polarity: Polarity,
    #[serde(default)]
    pub format: ScoreFormat,
}

impl GameSpec {
    pub fn new(id: impl Into<String>, polarity: Polarity) -> Self {
        Self {
            id: id.into(),
            polarity,
            format: ScoreFormat::default(),
        }
    }

    pub fn with_format(mut self, format: ScoreFormat) -> Self {
        self.format = format;
        self
    }

    /// Transform a submitted raw score into its ranked, stored value.
    pub fn encode(&self, raw: f64) -> Sanitized {
        codec::encode_for_storage(self.polarity, raw)
    }

    /// Render a stored value the way players see it.
    pub fn display(&self, stored: u64) -> String {
        codec::decode_for_display(self.polarity, self.format, stored)
    }
}

/// Errors raised while building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog contains no games")]
    Empty,
    #[error("catalog contains a game with an empty id")]
    EmptyId,
    #[error("duplicate game id in catalog: {0}")]
    DuplicateId(String),
}

#[derive(Deserialize)]
struct CatalogFile {
    games: Vec<GameSpec>,
}

/// Immutable mapping from game token to [`GameSpec`], in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCatalog {
    games: Vec<GameSpec>,
}

impl GameCatalog {
    pub fn new(games: Vec<GameSpec>) -> Result<Self, CatalogError> {
        if games.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, game) in games.iter().enumerate() {
            if game.id.trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if games[..i].iter().any(|g| g.id == game.id) {
                return Err(CatalogError::DuplicateId(game.id.clone()));
            }
        }
        Ok(Self { games })
    }

    /// Parse a catalog from its JSON file representation:
    /// `{ "games": [ { "id": "...", "polarity": "...", "format": "..." } ] }`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.games)
    }

    /// The arcade's shipped games.
    pub fn builtin() -> Self {
        const HIGHER: [&str; 10] = [
            "pump-clicker",
            "flappy-cock",
            "plankton-heist",
            "boating-school",
            "bikini-adventure",
            "jellyfish-fields",
            "patrick-friendship",
            "house-hoarder",
            "krusty-krab-rush",
            "krusty-tycoon",
        ];
        const TIMED: [&str; 3] = [
            "plankton-heist-level1",
            "plankton-heist-level2",
            "plankton-heist-level3",
        ];

        let games = HIGHER
            .iter()
            .map(|id| GameSpec::new(*id, Polarity::HigherIsBetter))
            .chain(
                TIMED
                    .iter()
                    .map(|id| GameSpec::new(*id, Polarity::LowerIsBetter)),
            )
            .collect();
        Self { games }
    }

    pub fn get(&self, id: &str) -> Option<&GameSpec> {
        self.games.iter().find(|g| g.id == id)
    }

    /// Like [`get`](Self::get), but an unknown token is an input error.
    pub fn resolve(&self, id: &str) -> Result<&GameSpec, InputError> {
        self.get(id)
            .ok_or_else(|| InputError::UnknownGame(id.to_string()))
    }

    pub fn games(&self) -> &[GameSpec] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Default for GameCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
