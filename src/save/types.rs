//! Save data types for the board game
//!
//! This module defines the values shared by the loader and the writer:
//! the snapshot handed to a save, the owner-slot encoding and the error type.

use crate::board::{GameState, Player, PlayerId, Square};
use std::path::PathBuf;

/// File used when no path is given
pub const DEFAULT_FILE_NAME: &str = "defaultFile.txt";

/// Number of squares on the board
pub const DEFAULT_BOARD_SIZE: usize = 40;

/// Capacity hint for the player list
pub const DEFAULT_MAX_PLAYERS: usize = 8;

/// Record tags as they appear in the first field of a line
pub const TAG_TIME: &str = "Time";
pub const TAG_GO_PAYOUT: &str = "GoPayout";
pub const TAG_PLAYER: &str = "Player";
pub const TAG_PROPERTY: &str = "Property";
pub const TAG_JAIL: &str = "Jail";
pub const TAG_GO: &str = "Go";

/// Turn marker values in a player record
pub const TURN_MARKER: &str = "*";
pub const NO_TURN_MARKER: &str = "-";

/// Mortgage flags in a property record
pub const MORTGAGED_FLAG: &str = "m";
pub const UNMORTGAGED_FLAG: &str = "u";

/// Written in place of an owner or jail counter that is absent
pub const NONE_VALUE: i32 = -1;

/// The owner slot of a property record
///
/// The same text field carries either a numeric owner reference or the
/// legacy mortgage marker `m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerSlot {
    /// Recorded owner reference; negative means unowned
    Owner(i32),
    Mortgaged,
}

impl OwnerSlot {
    /// Parses the raw slot. Returns None for anything that is neither
    /// the mortgage marker nor an integer.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == MORTGAGED_FLAG {
            return Some(OwnerSlot::Mortgaged);
        }
        raw.parse().ok().map(OwnerSlot::Owner)
    }
}

/// Everything a save writes, passed in explicitly by the caller
#[derive(Debug, Clone, Copy)]
pub struct SaveSnapshot<'a> {
    pub elapsed_time: i32,
    pub go_payout: i32,
    pub players: &'a [Player],
    pub squares: &'a [Square],
    pub turn_player_id: Option<PlayerId>,
}

impl<'a> From<&'a GameState> for SaveSnapshot<'a> {
    fn from(state: &'a GameState) -> Self {
        SaveSnapshot {
            elapsed_time: state.elapsed_time,
            go_payout: state.go_payout,
            players: &state.players,
            squares: &state.board,
            turn_player_id: state.turn_player_id,
        }
    }
}

/// Error types for save/load operations
#[derive(Debug)]
pub enum SaveError {
    /// A record has too few fields for its tag
    MalformedRecord {
        line: usize,
        tag: String,
        expected: usize,
        found: usize,
    },
    /// A field that must be numeric is not
    NumericParseFailure {
        line: usize,
        field: &'static str,
        value: String,
    },
    BoardIndexOutOfRange {
        line: usize,
        index: usize,
        board_size: usize,
    },
    /// Some player is in jail but the file has no jail square
    MissingJail,
    MissingFile(PathBuf),
    WriteFailure(std::io::Error),
    /// A text field would break the tab-separated layout
    UnencodableField {
        field: &'static str,
        value: String,
    },
    BoardSizeMismatch {
        expected: usize,
        found: usize,
    },
    Io(std::io::Error),
    Config(serde_json::Error),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::MalformedRecord { line, tag, expected, found } => write!(
                f,
                "Malformed {} record on line {}: expected {} fields, found {}",
                tag, line, expected, found
            ),
            SaveError::NumericParseFailure { line, field, value } => {
                write!(f, "Invalid {} on line {}: '{}'", field, line, value)
            }
            SaveError::BoardIndexOutOfRange { line, index, board_size } => write!(
                f,
                "Board index {} on line {} is outside a board of {} squares",
                index, line, board_size
            ),
            SaveError::MissingJail => write!(f, "Players are in jail but the board has no jail"),
            SaveError::MissingFile(path) => write!(f, "Save file not found: {}", path.display()),
            SaveError::WriteFailure(e) => write!(f, "Write failed: {}", e),
            SaveError::UnencodableField { field, value } => {
                write!(f, "Cannot save {} {:?}: empty or contains a tab or line break", field, value)
            }
            SaveError::BoardSizeMismatch { expected, found } => {
                write!(f, "Board has {} squares, expected {}", found, expected)
            }
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::WriteFailure(e) | SaveError::Io(e) => Some(e),
            SaveError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(err: std::io::Error) -> Self {
        SaveError::Io(err)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(err: serde_json::Error) -> Self {
        SaveError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_slot_parse() {
        assert_eq!(OwnerSlot::parse("m"), Some(OwnerSlot::Mortgaged));
        assert_eq!(OwnerSlot::parse("2"), Some(OwnerSlot::Owner(2)));
        assert_eq!(OwnerSlot::parse("-1"), Some(OwnerSlot::Owner(-1)));
        assert_eq!(OwnerSlot::parse("u"), None);
        assert_eq!(OwnerSlot::parse("M"), None);
    }

    #[test]
    fn test_error_messages_name_the_line() {
        let err = SaveError::MalformedRecord {
            line: 4,
            tag: "Player".to_string(),
            expected: 8,
            found: 3,
        };
        assert_eq!(err.to_string(), "Malformed Player record on line 4: expected 8 fields, found 3");

        let err = SaveError::NumericParseFailure {
            line: 2,
            field: "money",
            value: "lots".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid money on line 2: 'lots'");
    }

    #[test]
    fn test_snapshot_from_state() {
        let mut state = GameState::new(DEFAULT_BOARD_SIZE);
        state.elapsed_time = 12;
        state.go_payout = 200;
        state.turn_player_id = Some(1);

        let snapshot = SaveSnapshot::from(&state);
        assert_eq!(snapshot.elapsed_time, 12);
        assert_eq!(snapshot.go_payout, 200);
        assert_eq!(snapshot.squares.len(), DEFAULT_BOARD_SIZE);
        assert_eq!(snapshot.turn_player_id, Some(1));
    }
}
