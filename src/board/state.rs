use super::player::{Player, PlayerId};
use super::square::{JailSquare, Square};

/// Everything a save file restores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub elapsed_time: i32,
    /// Paid by the bank to anyone passing Go
    pub go_payout: i32,
    /// Exactly `board_size` squares, indexed by board position
    pub board: Vec<Square>,
    /// In load order, which is not necessarily id order
    pub players: Vec<Player>,
    pub turn_player_id: Option<PlayerId>,
    pub jail_position: Option<usize>,
    pub active_player_count: usize,
}

impl GameState {
    /// Creates an empty state with every square an action square
    pub fn new(board_size: usize) -> Self {
        GameState {
            elapsed_time: 0,
            go_payout: 0,
            board: vec![Square::Action; board_size],
            players: Vec::new(),
            turn_player_id: None,
            jail_position: None,
            active_player_count: 0,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id() == id)
    }

    /// The player whose turn it is, if the marker matched anyone
    pub fn current_player(&self) -> Option<&Player> {
        self.turn_player_id.and_then(|id| self.player(id))
    }

    pub fn jail(&self) -> Option<&JailSquare> {
        self.jail_position
            .and_then(|position| self.board.get(position))
            .and_then(Square::as_jail)
    }

    pub fn jail_mut(&mut self) -> Option<&mut JailSquare> {
        let position = self.jail_position?;
        self.board.get_mut(position).and_then(Square::as_jail_mut)
    }

    /// Links the property at `board_index` to the player at `player_index`
    /// in the player list, on both sides.
    ///
    /// Returns false if either end is missing or the square is not a property.
    pub fn link_owner(&mut self, board_index: usize, player_index: usize) -> bool {
        let Some(player) = self.players.get_mut(player_index) else {
            return false;
        };
        let Some(property) = self.board.get_mut(board_index).and_then(Square::as_property_mut) else {
            return false;
        };

        property.set_owner(Some(player.id()));
        player.add_property(board_index);
        true
    }

    /// Recomputes the number of players still in the game
    pub fn count_active_players(&self) -> usize {
        self.players.iter().filter(|player| !player.is_loser()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Property;

    #[test]
    fn test_new_state_is_all_action_squares() {
        let state = GameState::new(40);

        assert_eq!(state.board.len(), 40);
        assert!(state.board.iter().all(|square| *square == Square::Action));
        assert!(state.jail().is_none());
    }

    #[test]
    fn test_link_owner_is_bidirectional() {
        let mut state = GameState::new(10);
        state.board[3] = Square::Property(Property::new("ParkLane", 350, 35));
        state.players.push(Player::new(7, 1500, "Alice"));

        assert!(state.link_owner(3, 0));
        assert_eq!(state.board[3].as_property().unwrap().owner(), Some(7));
        assert_eq!(state.player(7).unwrap().owned_properties(), &[3]);
    }

    #[test]
    fn test_link_owner_rejects_non_property() {
        let mut state = GameState::new(10);
        state.players.push(Player::new(0, 1500, "Alice"));

        assert!(!state.link_owner(4, 0));
        assert!(!state.link_owner(40, 0));
        assert!(state.players[0].owned_properties().is_empty());
    }

    #[test]
    fn test_current_player() {
        let mut state = GameState::new(10);
        state.players.push(Player::new(0, 1500, "Alice"));
        state.players.push(Player::new(1, 1500, "Bob"));
        state.turn_player_id = Some(1);

        assert_eq!(state.current_player().unwrap().name(), "Bob");
    }
}
