// Board module
//
// In-memory game entities restored by the save system:
// - Squares (properties, jail, go, action squares)
// - Players and their finances
// - The assembled game state

pub mod player;
pub mod square;
pub mod state;

pub use player::{Player, PlayerId};
pub use square::{JailSquare, Property, Square};
pub use state::GameState;
