/// Identifier assigned to a player by the game, stable across saves.
pub type PlayerId = i32;

/// A participant in the game as far as persistence is concerned.
///
/// Owned properties are stored as board indices; the squares themselves
/// live on the board and point back at their owner by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    /// RGB value (0xRRGGBB)
    color: u32,
    money: i32,
    position: usize,
    loser: bool,
    in_jail: bool,
    jail_counter: u32,
    owned_properties: Vec<usize>,
}

impl Player {
    pub fn new(id: PlayerId, money: i32, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            color: 0,
            money,
            position: 0,
            loser: false,
            in_jail: false,
            jail_counter: 0,
            owned_properties: Vec::new(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn set_color(&mut self, color: u32) {
        self.color = color;
    }

    pub fn money(&self) -> i32 {
        self.money
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// True once the player has gone bankrupt. Never cleared.
    pub fn is_loser(&self) -> bool {
        self.loser
    }

    pub fn set_loser(&mut self, loser: bool) {
        self.loser = loser;
    }

    pub fn is_in_jail(&self) -> bool {
        self.in_jail
    }

    /// Sends the player to jail with a fresh counter
    pub fn go_to_jail(&mut self) {
        self.in_jail = true;
        self.jail_counter = 0;
    }

    pub fn jail_counter(&self) -> u32 {
        self.jail_counter
    }

    /// Advances the jail counter by one turn
    pub fn add_to_jail_counter(&mut self) {
        self.jail_counter += 1;
    }

    /// Board indices of every property this player holds, in link order
    pub fn owned_properties(&self) -> &[usize] {
        &self.owned_properties
    }

    pub fn add_property(&mut self, board_index: usize) {
        if !self.owned_properties.contains(&board_index) {
            self.owned_properties.push(board_index);
        }
    }
}
