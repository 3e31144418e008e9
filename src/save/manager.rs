//! Save manager for handling named save slots
//!
//! This module provides the SaveManager struct which handles:
//! - Keeping save files in one directory
//! - Rotating the previous save into a timestamped backup
//! - Pruning old backups
//! - Listing and loading saves

use super::handler::FileHandler;
use super::types::*;
use super::writer;
use crate::config::HandlerConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const SAVE_EXTENSION: &str = "txt";
const BACKUP_EXTENSION: &str = "bak";

pub struct SaveManager {
    save_directory: PathBuf,
    config: HandlerConfig,
}

impl SaveManager {
    /// Creates a new SaveManager with the given save directory
    ///
    /// The save directory will be created if it doesn't exist.
    pub fn new(save_directory: impl AsRef<Path>, config: HandlerConfig) -> Result<Self, SaveError> {
        let save_dir = save_directory.as_ref().to_path_buf();

        if !save_dir.exists() {
            fs::create_dir_all(&save_dir)?;
        }

        Ok(SaveManager {
            save_directory: save_dir,
            config,
        })
    }

    /// Creates a SaveManager over `default_directory()`
    pub fn with_default_directory(config: HandlerConfig) -> Result<Self, SaveError> {
        Self::new(Self::default_directory(), config)
    }

    /// `~/.oakland-oligarchy/saves`, or `./saves` without a home directory
    pub fn default_directory() -> PathBuf {
        default_directory_in(dirs::home_dir())
    }

    pub fn save_directory(&self) -> &Path {
        &self.save_directory
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.save_directory.join(format!("{}.{}", slot, SAVE_EXTENSION))
    }

    /// Saves into `slot`, keeping the previous save as a backup
    pub fn save_slot(&self, slot: &str, snapshot: &SaveSnapshot) -> Result<PathBuf, SaveError> {
        if snapshot.squares.len() != self.config.board_size {
            return Err(SaveError::BoardSizeMismatch {
                expected: self.config.board_size,
                found: snapshot.squares.len(),
            });
        }

        let path = self.slot_path(slot);
        if path.exists() {
            self.backup(slot, &path)?;
        }

        writer::save_to_path(&path, snapshot)?;
        log::info!("Game saved to: {}", path.display());

        self.cleanup_backups(slot)?;
        Ok(path)
    }

    /// Loads the save in `slot`
    pub fn load_slot(&self, slot: &str) -> Result<FileHandler, SaveError> {
        FileHandler::from_path_with_config(self.slot_path(slot), self.config.clone())
    }

    pub fn save_exists(&self, slot: &str) -> bool {
        self.slot_path(slot).exists()
    }

    fn backup(&self, slot: &str, path: &Path) -> Result<(), SaveError> {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let backup = self
            .save_directory
            .join(format!("{}_{}.{}", slot, timestamp, BACKUP_EXTENSION));

        fs::copy(path, &backup).map_err(SaveError::WriteFailure)?;
        log::debug!("Backed up {} to {}", path.display(), backup.display());
        Ok(())
    }

    /// Backups of `slot`, newest first
    pub fn backups(&self, slot: &str) -> Result<Vec<PathBuf>, SaveError> {
        let prefix = format!("{}_", slot);

        let mut backups: Vec<PathBuf> = fs::read_dir(&self.save_directory)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some(BACKUP_EXTENSION))
            .filter(|path| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|stem| stem.strip_prefix(&prefix))
                    .is_some_and(is_timestamp)
            })
            .collect();

        // Timestamps sort lexically
        backups.sort();
        backups.reverse();
        Ok(backups)
    }

    /// Delete old backups, keeping only the configured number of most recent ones
    pub fn cleanup_backups(&self, slot: &str) -> Result<(), SaveError> {
        for backup in self.backups(slot)?.iter().skip(self.config.keep_backups) {
            fs::remove_file(backup)?;
        }
        Ok(())
    }

    /// List all save slots, most recently modified first
    pub fn list_saves(&self) -> Result<Vec<SaveFileInfo>, SaveError> {
        let mut saves = Vec::new();

        for entry in fs::read_dir(&self.save_directory)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some(SAVE_EXTENSION) {
                continue;
            }
            if let Some(slot) = path.file_stem().and_then(|s| s.to_str()) {
                let modified = entry.metadata()?.modified()?;
                saves.push(SaveFileInfo {
                    slot: slot.to_string(),
                    path: path.clone(),
                    modified,
                });
            }
        }

        saves.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.slot.cmp(&b.slot)));

        Ok(saves)
    }
}

fn default_directory_in(home: Option<PathBuf>) -> PathBuf {
    home.map(|p| p.join(".oakland-oligarchy/saves"))
        .unwrap_or_else(|| PathBuf::from("./saves"))
}

/// `YYYYmmdd_HHMMSS`
fn is_timestamp(text: &str) -> bool {
    chrono::NaiveDateTime::parse_from_str(text, "%Y%m%d_%H%M%S").is_ok()
}

#[derive(Debug, Clone)]
pub struct SaveFileInfo {
    pub slot: String,
    pub path: PathBuf,
    pub modified: SystemTime,
}
