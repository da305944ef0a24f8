//! Game source for the quality analyzer: PGN and JSON readers producing
//! replay-validated [`game_data::GameData`] records.

pub mod error;
pub mod game_data;
pub mod json_input;
pub mod pgn;

pub use error::GameSourceError;
pub use game_data::{GameData, GameMetadata};
