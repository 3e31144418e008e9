//! Save file writer
//!
//! Writes the same records the loader reads, in a fixed order: time,
//! go payout, one line per player, a blank line, then one line per
//! square that is not an action square.

use super::types::*;
use crate::board::{Player, PlayerId, Property, Square};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `snapshot` to `path` without ever leaving a partial file behind
///
/// Records go to a temporary file next to `path`, which replaces `path`
/// only once it has been fully written and flushed.
pub fn save_to_path(path: impl AsRef<Path>, snapshot: &SaveSnapshot) -> Result<(), SaveError> {
    let path = path.as_ref();
    let temp = temp_path(path);

    let result = write_file(&temp, snapshot)
        .and_then(|()| fs::rename(&temp, path).map_err(SaveError::WriteFailure));

    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

fn write_file(path: &Path, snapshot: &SaveSnapshot) -> Result<(), SaveError> {
    let file = File::create(path).map_err(SaveError::WriteFailure)?;
    let mut out = BufWriter::new(file);
    write_records(&mut out, snapshot)?;

    let file = out
        .into_inner()
        .map_err(|e| SaveError::WriteFailure(e.into_error()))?;
    file.sync_all().map_err(SaveError::WriteFailure)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

/// Writes every record of `snapshot` to `out`
pub fn write_records<W: Write>(out: &mut W, snapshot: &SaveSnapshot) -> Result<(), SaveError> {
    line(out, format_args!("{}\t{}", TAG_TIME, snapshot.elapsed_time))?;
    line(out, format_args!("{}\t{}", TAG_GO_PAYOUT, snapshot.go_payout))?;

    for player in snapshot.players {
        save_player(out, player, snapshot.turn_player_id)?;
    }
    line(out, format_args!(""))?;

    for (index, square) in snapshot.squares.iter().enumerate() {
        save_square(out, square, index)?;
    }
    Ok(())
}

/// `Player  id  name  color  money  position  turnMarker  jailCount`
fn save_player<W: Write>(out: &mut W, player: &Player, turn: Option<PlayerId>) -> Result<(), SaveError> {
    let name = encodable("player name", player.name())?;
    let marker = if turn == Some(player.id()) {
        TURN_MARKER
    } else {
        NO_TURN_MARKER
    };
    let jail = if player.is_in_jail() {
        i64::from(player.jail_counter())
    } else {
        i64::from(NONE_VALUE)
    };

    line(
        out,
        format_args!(
            "{}\t{}\t{}\t0x{:06x}\t{}\t{}\t{}\t{}",
            TAG_PLAYER,
            player.id(),
            name,
            player.color(),
            player.money(),
            player.position(),
            marker,
            jail
        ),
    )
}

fn save_square<W: Write>(out: &mut W, square: &Square, index: usize) -> Result<(), SaveError> {
    match square {
        Square::Property(property) => save_property(out, property, index),
        Square::Jail(_) => line(out, format_args!("{}\t{}", TAG_JAIL, index)),
        Square::Go => line(out, format_args!("{}\t{}", TAG_GO, index)),
        // Recreated by the loader from the gap
        Square::Action => Ok(()),
    }
}

/// `Property  index  name  price  rent  ownerId  m|u`
fn save_property<W: Write>(out: &mut W, property: &Property, index: usize) -> Result<(), SaveError> {
    let name = encodable("property name", property.name())?;
    let owner = match property.owner() {
        // Would read back as unowned
        Some(id) if id < 0 => {
            return Err(SaveError::UnencodableField {
                field: "property owner",
                value: id.to_string(),
            });
        }
        Some(id) => id,
        None => NONE_VALUE,
    };
    let flag = if property.is_mortgaged() {
        MORTGAGED_FLAG
    } else {
        UNMORTGAGED_FLAG
    };

    line(
        out,
        format_args!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            TAG_PROPERTY,
            index,
            name,
            property.price(),
            property.rent(),
            owner,
            flag
        ),
    )
}

/// Rejects text that would not read back as a single field
fn encodable<'a>(field: &'static str, value: &'a str) -> Result<&'a str, SaveError> {
    if value.is_empty() || value.contains(['\t', '\n', '\r']) {
        return Err(SaveError::UnencodableField {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn line<W: Write>(out: &mut W, args: fmt::Arguments) -> Result<(), SaveError> {
    out.write_fmt(args)
        .and_then(|()| out.write_all(b"\n"))
        .map_err(SaveError::WriteFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{GameState, JailSquare};
    use crate::config::HandlerConfig;
    use crate::save::loader::load;
    use proptest::prelude::*;

    fn sample_state() -> GameState {
        let mut state = GameState::new(DEFAULT_BOARD_SIZE);
        state.elapsed_time = 5;
        state.go_payout = 200;
        state.board[0] = Square::Go;
        state.board[3] = Square::Property(Property::new("ParkLane", 350, 35));
        state.board[10] = Square::Jail(JailSquare::default());
        state.jail_position = Some(10);

        let mut mayfair = Property::new("Mayfair", 400, 50);
        mayfair.set_mortgaged(true);
        state.board[39] = Square::Property(mayfair);

        let mut alice = Player::new(0, 1500, "Alice");
        alice.set_color(0xff0000);
        let mut bob = Player::new(1, -50, "Bob");
        bob.set_color(0x00ff00);
        bob.set_position(10);
        bob.set_loser(true);
        bob.go_to_jail();
        for _ in 0..3 {
            bob.add_to_jail_counter();
        }
        state.players = vec![alice, bob];
        state.turn_player_id = Some(0);
        state.active_player_count = 1;

        state.link_owner(3, 0);
        state.jail_mut().unwrap().add_prisoner(1);
        state
    }

    fn to_text(state: &GameState) -> String {
        let mut out = Vec::new();
        write_records(&mut out, &SaveSnapshot::from(state)).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_record_layout() {
        let text = to_text(&sample_state());
        let expected = "Time\t5\n\
                        GoPayout\t200\n\
                        Player\t0\tAlice\t0xff0000\t1500\t0\t*\t-1\n\
                        Player\t1\tBob\t0x00ff00\t-50\t10\t-\t3\n\
                        \n\
                        Go\t0\n\
                        Property\t3\tParkLane\t350\t35\t0\tu\n\
                        Jail\t10\n\
                        Property\t39\tMayfair\t400\t50\t-1\tm\n";

        assert_eq!(text, expected);
    }

    #[test]
    fn test_payout_comes_from_the_snapshot() {
        let state = sample_state();
        let snapshot = SaveSnapshot {
            go_payout: 400,
            ..SaveSnapshot::from(&state)
        };
        let mut out = Vec::new();
        write_records(&mut out, &snapshot).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("GoPayout\t400\n"));
    }

    #[test]
    fn test_round_trip_sample() {
        let state = sample_state();
        let loaded = load(to_text(&state).as_bytes(), &HandlerConfig::default()).unwrap();

        assert_eq!(loaded, state);
    }

    #[test]
    fn test_name_with_tab_is_rejected() {
        let mut state = sample_state();
        state.players.push(Player::new(2, 10, "Car\tol"));
        let mut out = Vec::new();

        assert!(matches!(
            write_records(&mut out, &SaveSnapshot::from(&state)),
            Err(SaveError::UnencodableField { field: "player name", .. })
        ));
    }

    #[test]
    fn test_empty_property_name_is_rejected() {
        let mut state = sample_state();
        state.board[5] = Square::Property(Property::new("", 10, 1));
        let mut out = Vec::new();

        assert!(matches!(
            write_records(&mut out, &SaveSnapshot::from(&state)),
            Err(SaveError::UnencodableField { field: "property name", .. })
        ));
    }

    #[test]
    fn test_unowned_property_next_to_negative_player_id() {
        let mut state = sample_state();
        state.players.push(Player::new(-1, 100, "Carol"));
        state.active_player_count = 2;

        let loaded = load(to_text(&state).as_bytes(), &HandlerConfig::default()).unwrap();
        assert_eq!(loaded.board[39].as_property().unwrap().owner(), None);
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_negative_owner_id_is_rejected() {
        let mut state = sample_state();
        state.players.push(Player::new(-1, 100, "Carol"));
        state.link_owner(39, 2);
        let mut out = Vec::new();

        assert!(matches!(
            write_records(&mut out, &SaveSnapshot::from(&state)),
            Err(SaveError::UnencodableField { field: "property owner", .. })
        ));
    }

    #[test]
    fn test_save_to_path_replaces_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("game.txt");
        fs::write(&path, "old contents").unwrap();

        save_to_path(&path, &SaveSnapshot::from(&sample_state())).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), to_text(&sample_state()));
        assert!(!dir.path().join(".game.txt.tmp").exists());
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("game.txt");
        fs::write(&path, "old contents").unwrap();

        let mut state = sample_state();
        state.players.push(Player::new(2, 10, "Bad\nName"));

        assert!(save_to_path(&path, &SaveSnapshot::from(&state)).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old contents");
        assert!(!dir.path().join(".game.txt.tmp").exists());
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("game.txt");

        assert!(matches!(
            save_to_path(&path, &SaveSnapshot::from(&sample_state())),
            Err(SaveError::WriteFailure(_))
        ));
    }

    const JAIL_INDEX: usize = 10;

    proptest! {
        #[test]
        fn test_round_trip_preserves_state(
            players in prop::collection::vec(
                ("[A-Za-z]{1,8}", 0u32..=0xff_ffff, -500i32..5000, 0usize..40, prop::option::of(0u32..5)),
                0..6,
            ),
            squares in prop::collection::vec(
                (0u8..4, "[A-Za-z]{1,8}", 0u32..1000, 0u32..200, prop::option::of(0usize..6), any::<bool>()),
                DEFAULT_BOARD_SIZE,
            ),
            turn in prop::option::of(0usize..6),
            time in 0i32..100_000,
            payout in 0i32..1000,
        ) {
            let mut state = GameState::new(DEFAULT_BOARD_SIZE);
            state.elapsed_time = time;
            state.go_payout = payout;

            // Ids deliberately differ from list positions
            for (index, (name, color, money, position, jail)) in players.iter().enumerate() {
                let mut player = Player::new(index as i32 * 3 + 1, *money, name.as_str());
                player.set_color(*color);
                player.set_position(*position);
                player.set_loser(*money < 0);
                if let Some(count) = jail {
                    player.go_to_jail();
                    for _ in 0..*count {
                        player.add_to_jail_counter();
                    }
                }
                state.players.push(player);
            }
            state.active_player_count = state.count_active_players();
            state.turn_player_id = turn
                .and_then(|index| state.players.get(index))
                .map(Player::id);

            for (index, (kind, name, price, rent, _, mortgaged)) in squares.iter().enumerate() {
                state.board[index] = if index == JAIL_INDEX {
                    Square::Jail(JailSquare::default())
                } else {
                    match *kind {
                        0 | 1 => {
                            let mut property = Property::new(name.as_str(), *price, *rent);
                            property.set_mortgaged(*mortgaged);
                            Square::Property(property)
                        }
                        2 => Square::Go,
                        _ => Square::Action,
                    }
                };
            }
            state.jail_position = Some(JAIL_INDEX);

            for (index, (_, _, _, _, owner, _)) in squares.iter().enumerate() {
                if let Some(owner) = owner {
                    if state.players.get(*owner).is_some_and(|player| !player.is_loser()) {
                        state.link_owner(index, *owner);
                    }
                }
            }
            let prisoners: Vec<PlayerId> = state
                .players
                .iter()
                .filter(|player| player.is_in_jail())
                .map(Player::id)
                .collect();
            for id in prisoners {
                state.jail_mut().unwrap().add_prisoner(id);
            }

            let text = to_text(&state);
            let loaded = load(text.as_bytes(), &HandlerConfig::default()).unwrap();
            prop_assert_eq!(loaded, state);
        }
    }
}
