//! Configuration for the leaderboard service.
//!
//! Every value has a default and can be overridden through an environment
//! variable; the CLI flags in `main.rs` take precedence over both.
//!
//! Data directory precedence:
//! 1. LEADERBOARD_DATA_DIR environment variable
//! 2. the platform data directory (e.g. ~/.local/share/reefboard)
//! 3. ./data (fallback for development)

use directories::ProjectDirs;
use scoring::{CatalogError, GameCatalog};
use std::path::{Path, PathBuf};

const DEV_DATA_DIR: &str = "./data";
const DATABASE_FILE: &str = "leaderboard.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read catalog {}: {source}", path.display())]
    CatalogRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog {}: {source}", path.display())]
    Catalog {
        path: PathBuf,
        source: CatalogError,
    },
}

/// Get the data directory for persistence.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LEADERBOARD_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(dirs) = ProjectDirs::from("", "", "reefboard") {
        return dirs.data_dir().to_path_buf();
    }

    PathBuf::from(DEV_DATA_DIR)
}

/// Get the SQLite database path.
///
/// Priority:
/// 1. LEADERBOARD_DB_PATH env variable if set
/// 2. `leaderboard.db` inside [`get_data_dir`]
pub fn get_database_path() -> PathBuf {
    if let Ok(path) = std::env::var("LEADERBOARD_DB_PATH") {
        return PathBuf::from(path);
    }

    get_data_dir().join(DATABASE_FILE)
}

/// Path of a JSON catalog file, if one is configured via LEADERBOARD_CATALOG.
pub fn get_catalog_path() -> Option<PathBuf> {
    std::env::var("LEADERBOARD_CATALOG").ok().map(PathBuf::from)
}

/// Directory for rolling log files, if file logging is enabled via
/// LEADERBOARD_LOG_DIR.
pub fn get_log_dir() -> Option<PathBuf> {
    std::env::var("LEADERBOARD_LOG_DIR").ok().map(PathBuf::from)
}

/// Load the game catalog from `path`, or the built-in catalog when `None`.
pub fn load_catalog(path: Option<&Path>) -> Result<GameCatalog, ConfigError> {
    let Some(path) = path else {
        return Ok(GameCatalog::builtin());
    };

    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = GameCatalog::from_json(&json).map_err(|source| ConfigError::Catalog {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), games = catalog.len(), "Loaded game catalog");
    Ok(catalog)
}
