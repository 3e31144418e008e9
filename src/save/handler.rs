//! File handler
//!
//! Loads a save file once at construction and exposes the restored game.
//! Saving is independent of what was loaded: the caller passes the live
//! values in explicitly.

use super::loader;
use super::types::*;
use super::writer;
use crate::board::{GameState, Player, PlayerId, Square};
use crate::config::HandlerConfig;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

pub struct FileHandler {
    /// Where the state was loaded from, if it came from a named file
    source: Option<PathBuf>,
    config: HandlerConfig,
    state: GameState,
}

impl FileHandler {
    /// Loads the save file at `path` with the default configuration
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SaveError> {
        Self::from_path_with_config(path, HandlerConfig::default())
    }

    pub fn from_path_with_config(path: impl AsRef<Path>, config: HandlerConfig) -> Result<Self, SaveError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SaveError::MissingFile(path.to_path_buf()),
            _ => SaveError::Io(e),
        })?;

        log::info!("Loading game from {}", path.display());
        let mut handler = Self::from_file(file, config)?;
        handler.source = Some(path.to_path_buf());
        Ok(handler)
    }

    /// Loads from an already opened file; the file is closed on return
    pub fn from_file(file: File, config: HandlerConfig) -> Result<Self, SaveError> {
        Self::from_reader(file, config)
    }

    pub fn from_reader<R: Read>(reader: R, config: HandlerConfig) -> Result<Self, SaveError> {
        let state = loader::load(BufReader::new(reader), &config)?;
        Ok(FileHandler {
            source: None,
            config,
            state,
        })
    }

    /// Loads the configured default file from the working directory
    pub fn open_default() -> Result<Self, SaveError> {
        Self::open_default_with_config(HandlerConfig::default())
    }

    pub fn open_default_with_config(config: HandlerConfig) -> Result<Self, SaveError> {
        let path = PathBuf::from(&config.default_file_name);
        Self::from_path_with_config(path, config)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn time(&self) -> i32 {
        self.state.elapsed_time
    }

    pub fn board(&self) -> &[Square] {
        &self.state.board
    }

    pub fn players(&self) -> &[Player] {
        &self.state.players
    }

    pub fn go_payout(&self) -> i32 {
        self.state.go_payout
    }

    pub fn jail_position(&self) -> Option<usize> {
        self.state.jail_position
    }

    pub fn active_players(&self) -> usize {
        self.state.active_player_count
    }

    pub fn player_turn(&self) -> Option<PlayerId> {
        self.state.turn_player_id
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Hands the loaded state over to the game
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Writes `snapshot` to `path`
    ///
    /// The board must have as many squares as this handler's configured
    /// board size, otherwise nothing is written.
    pub fn save(&self, path: impl AsRef<Path>, snapshot: &SaveSnapshot) -> Result<(), SaveError> {
        if snapshot.squares.len() != self.config.board_size {
            return Err(SaveError::BoardSizeMismatch {
                expected: self.config.board_size,
                found: snapshot.squares.len(),
            });
        }

        let path = path.as_ref();
        writer::save_to_path(path, snapshot)?;
        log::info!(
            "Saved {} players and {} squares to {}",
            snapshot.players.len(),
            snapshot.squares.len(),
            path.display()
        );
        Ok(())
    }
}
