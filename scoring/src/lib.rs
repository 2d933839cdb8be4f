pub mod catalog;
pub mod codec;
pub mod input;

pub use catalog::{CatalogError, GameCatalog, GameSpec, Polarity, ScoreFormat};
pub use codec::{
    decode_for_display, encode_for_storage, format_compact, format_grouped, sanitize,
    sanitize_stored, storage_ceiling, Sanitized, INVERT_BASE, MAX_SAFE_SCORE,
};
pub use input::{validate_limit, InputError, PlayerName, RawScore, MAX_PLAYER_NAME_LEN};
