//! Save/Load system for the board game
//!
//! Game state is stored as a flat, tab-separated text file with one record
//! per line:
//!
//! ```text
//! Time        5
//! GoPayout    200
//! Player      0   Alice   0xff0000    1500    0   *   -1
//!
//! Go          0
//! Property    3   ParkLane    350 35  0   u
//! Jail        10
//! ```
//!
//! # Architecture
//!
//! - `types`: Snapshot, owner slot and error types
//! - `record`: Line tokenizer and record dispatch
//! - `loader`: Two-pass loader (records, then owners and prisoners)
//! - `writer`: Record writer and atomic file save
//! - `handler`: FileHandler, the load/save entry point
//! - `manager`: SaveManager for named slots and backups
//!
//! # Example Usage
//!
//! ```ignore
//! let handler = FileHandler::from_path("defaultFile.txt")?;
//! let mut state = handler.state().clone();
//!
//! // ... play ...
//!
//! handler.save("defaultFile.txt", &SaveSnapshot::from(&state))?;
//! ```

pub mod handler;
pub mod loader;
pub mod manager;
pub mod record;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use handler::FileHandler;
pub use manager::{SaveFileInfo, SaveManager};
pub use types::*;
