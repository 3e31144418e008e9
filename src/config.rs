//! Handler configuration
//!
//! Loaded from a JSON file when one is given; every field falls back to
//! its default so a partial file is fine.

use crate::save::types::{DEFAULT_BOARD_SIZE, DEFAULT_FILE_NAME, DEFAULT_MAX_PLAYERS, SaveError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the owner field of a property record is matched to a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OwnerLookup {
    /// The field holds the owning player's id
    #[default]
    ById,
    /// The field holds the owner's position in the player list, as older
    /// save files assumed
    ByListPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    pub board_size: usize,
    pub max_players: usize,
    pub default_file_name: String,
    pub owner_lookup: OwnerLookup,
    /// Timestamped backups kept per save slot
    pub keep_backups: usize,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        HandlerConfig {
            board_size: DEFAULT_BOARD_SIZE,
            max_players: DEFAULT_MAX_PLAYERS,
            default_file_name: DEFAULT_FILE_NAME.to_string(),
            owner_lookup: OwnerLookup::default(),
            keep_backups: 3,
        }
    }
}

impl HandlerConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SaveError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SaveError::MissingFile(path.to_path_buf()),
            _ => SaveError::Io(e),
        })?;
        let config: HandlerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}
