//! Save file loader
//!
//! Records may come in any order, so loading happens in two passes:
//! every line is turned into players and squares first, with property
//! owners parked in a side table, and only then are owners and prisoners
//! linked up against the complete player list.

use super::record::{Record, RecordKind};
use super::types::*;
use crate::board::{GameState, JailSquare, Player, PlayerId, Property, Square};
use crate::config::{HandlerConfig, OwnerLookup};
use std::collections::HashMap;
use std::io::BufRead;

/// Reads a whole save file from `reader`
pub fn load<R: BufRead>(reader: R, config: &HandlerConfig) -> Result<GameState, SaveError> {
    let mut loader = Loader::new(config);
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        loader.load_line(index + 1, &line)?;
    }
    loader.finish()
}

/// Accumulates entities while records are read
pub struct Loader<'c> {
    config: &'c HandlerConfig,
    elapsed_time: i32,
    go_payout: i32,
    squares: Vec<Option<Square>>,
    players: Vec<Player>,
    /// Board index -> recorded owner, resolved once all players exist
    pending_owners: HashMap<usize, i32>,
    turn_player_id: Option<PlayerId>,
    jail_position: Option<usize>,
    active_player_count: usize,
}

impl<'c> Loader<'c> {
    pub fn new(config: &'c HandlerConfig) -> Self {
        Loader {
            config,
            elapsed_time: 0,
            go_payout: 0,
            squares: vec![None; config.board_size],
            players: Vec::with_capacity(config.max_players),
            pending_owners: HashMap::new(),
            turn_player_id: None,
            jail_position: None,
            active_player_count: 0,
        }
    }

    /// Loads a single physical line. Blank and separator lines are skipped.
    pub fn load_line(&mut self, line: usize, text: &str) -> Result<(), SaveError> {
        let Some(record) = Record::parse(line, text) else {
            return Ok(());
        };

        match record.kind() {
            RecordKind::Time => {
                self.elapsed_time = record.number(1, "time")?;
            }
            RecordKind::GoPayout => {
                self.go_payout = record.number(1, "go payout")?;
            }
            RecordKind::Player => self.load_player(&record)?,
            RecordKind::Square => self.load_square(&record)?,
        }
        Ok(())
    }

    /// `Player  id  name  color  money  position  turnMarker  jailCount`
    fn load_player(&mut self, record: &Record) -> Result<(), SaveError> {
        record.require(8)?;

        let id: PlayerId = record.number(1, "player id")?;
        let money: i32 = record.number(4, "money")?;
        let mut player = Player::new(id, money, record.field(2)?);
        player.set_position(record.number(5, "position")?);

        if money < 0 {
            player.set_loser(true);
        } else {
            self.active_player_count += 1;
        }

        player.set_color(record.color(3, "color")?);

        if record.field(6)? == TURN_MARKER {
            self.turn_player_id = Some(id);
        }

        let jail: i32 = record.number(7, "jail counter")?;
        if jail >= 0 {
            player.go_to_jail();
            // Counter advances one turn at a time, as it does in play
            for _ in 0..jail {
                player.add_to_jail_counter();
            }
        }

        log::debug!("Loaded player {} '{}' on line {}", id, player.name(), record.line());
        self.players.push(player);
        Ok(())
    }

    /// `Property  index  name  price  rent  owner  [m|u]`, `Jail  index`, `Go  index`
    ///
    /// Other tags are skipped; their positions become action squares.
    fn load_square(&mut self, record: &Record) -> Result<(), SaveError> {
        let tag = record.tag();
        if !matches!(tag, TAG_PROPERTY | TAG_JAIL | TAG_GO) {
            log::warn!("Skipping unknown record '{}' on line {}", tag, record.line());
            return Ok(());
        }

        let current: usize = record.number(1, "board index")?;
        if current >= self.config.board_size {
            return Err(SaveError::BoardIndexOutOfRange {
                line: record.line(),
                index: current,
                board_size: self.config.board_size,
            });
        }

        // A later record for the same position replaces the earlier one
        self.pending_owners.remove(&current);
        if self.jail_position == Some(current) {
            self.jail_position = None;
        }

        let square = match tag {
            TAG_PROPERTY => self.load_property(record, current)?,
            TAG_JAIL => {
                self.jail_position = Some(current);
                Square::Jail(JailSquare::default())
            }
            _ => Square::Go,
        };

        log::debug!("Loaded {} at {} on line {}", tag, current, record.line());
        self.squares[current] = Some(square);
        Ok(())
    }

    fn load_property(&mut self, record: &Record, current: usize) -> Result<Square, SaveError> {
        record.require(6)?;

        let mut property = Property::new(
            record.field(2)?,
            record.number(3, "price")?,
            record.number(4, "rent")?,
        );

        let raw = record.field(5)?;
        match OwnerSlot::parse(raw).ok_or_else(|| record.numeric_error("owner", raw))? {
            OwnerSlot::Mortgaged => property.set_mortgaged(true),
            OwnerSlot::Owner(owner) if owner >= 0 => {
                self.pending_owners.insert(current, owner);
            }
            // Negative means unowned
            OwnerSlot::Owner(_) => {}
        }

        if record.get(6) == Some(MORTGAGED_FLAG) {
            property.set_mortgaged(true);
        }

        Ok(Square::Property(property))
    }

    /// Fills the gaps in the board, links owners and jails prisoners
    pub fn finish(self) -> Result<GameState, SaveError> {
        let mut state = GameState {
            elapsed_time: self.elapsed_time,
            go_payout: self.go_payout,
            board: self
                .squares
                .into_iter()
                .map(|square| square.unwrap_or(Square::Action))
                .collect(),
            players: self.players,
            turn_player_id: self.turn_player_id,
            jail_position: self.jail_position,
            active_player_count: self.active_player_count,
        };

        set_square_owners(&mut state, &self.pending_owners, self.config.owner_lookup);
        load_players_into_jail(&mut state)?;

        log::info!(
            "Loaded {} players ({} active) and {} squares",
            state.players.len(),
            state.active_player_count,
            state.board.len()
        );
        Ok(state)
    }
}

/// Links every property with a recorded owner to that owner
///
/// Owners that have already lost are not linked; the property loads unowned.
fn set_square_owners(state: &mut GameState, pending: &HashMap<usize, i32>, lookup: OwnerLookup) {
    let mut by_id: HashMap<PlayerId, usize> = HashMap::new();
    for (index, player) in state.players.iter().enumerate() {
        by_id.entry(player.id()).or_insert(index);
    }

    for board_index in 0..state.board.len() {
        let Some(&owner) = pending.get(&board_index) else {
            continue;
        };

        let player_index = match lookup {
            OwnerLookup::ById => by_id.get(&owner).copied(),
            OwnerLookup::ByListPosition => usize::try_from(owner)
                .ok()
                .filter(|&index| index < state.players.len()),
        };
        let Some(player_index) = player_index else {
            continue;
        };

        if state.players[player_index].is_loser() {
            log::warn!(
                "Dropping ownership of square {}: player {} has lost",
                board_index,
                state.players[player_index].id()
            );
            continue;
        }

        state.link_owner(board_index, player_index);
    }
}

/// Puts every incarcerated player into the jail square, in load order
fn load_players_into_jail(state: &mut GameState) -> Result<(), SaveError> {
    let prisoners: Vec<PlayerId> = state
        .players
        .iter()
        .filter(|player| player.is_in_jail())
        .map(Player::id)
        .collect();

    if prisoners.is_empty() {
        return Ok(());
    }

    let jail = state.jail_mut().ok_or(SaveError::MissingJail)?;
    for id in prisoners {
        jail.add_prisoner(id);
    }
    Ok(())
}
