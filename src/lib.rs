//! Save and restore for a property-trading board game

pub mod board;
pub mod config;
pub mod save;

pub use board::{GameState, JailSquare, Player, PlayerId, Property, Square};
pub use config::{HandlerConfig, OwnerLookup};
pub use save::{FileHandler, SaveError, SaveManager, SaveSnapshot};
