use super::player::PlayerId;

/// One position on the board
///
/// The variant decides how the square is written to a save file:
/// `Action` squares are never written and are re-created on load for
/// every position that has no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Square {
    Property(Property),
    Jail(JailSquare),
    Go,
    Action,
}

impl Square {
    pub fn name(&self) -> &str {
        match self {
            Square::Property(property) => property.name(),
            Square::Jail(jail) => jail.name(),
            Square::Go => "Go",
            Square::Action => "Action",
        }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match self {
            Square::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_property_mut(&mut self) -> Option<&mut Property> {
        match self {
            Square::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_jail(&self) -> Option<&JailSquare> {
        match self {
            Square::Jail(jail) => Some(jail),
            _ => None,
        }
    }

    pub fn as_jail_mut(&mut self) -> Option<&mut JailSquare> {
        match self {
            Square::Jail(jail) => Some(jail),
            _ => None,
        }
    }
}

/// A square that can be bought, rented out and mortgaged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    price: u32,
    rent: u32,
    owner: Option<PlayerId>,
    mortgaged: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, price: u32, rent: u32) -> Self {
        Property {
            name: name.into(),
            price,
            rent,
            owner: None,
            mortgaged: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> u32 {
        self.price
    }

    pub fn rent(&self) -> u32 {
        self.rent
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: Option<PlayerId>) {
        self.owner = owner;
    }

    pub fn is_mortgaged(&self) -> bool {
        self.mortgaged
    }

    pub fn set_mortgaged(&mut self, mortgaged: bool) {
        self.mortgaged = mortgaged;
    }
}

/// The board's single jail and the players currently held in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JailSquare {
    name: String,
    prisoners: Vec<PlayerId>,
}

impl JailSquare {
    pub fn new(name: impl Into<String>) -> Self {
        JailSquare {
            name: name.into(),
            prisoners: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prisoners(&self) -> &[PlayerId] {
        &self.prisoners
    }

    pub fn add_prisoner(&mut self, player: PlayerId) {
        self.prisoners.push(player);
    }
}

impl Default for JailSquare {
    fn default() -> Self {
        Self::new("Jail")
    }
}
