use serde::{Deserialize, Serialize};
use shakmaty::Color;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2", "*"
    pub white_rating: Option<u32>,
    pub black_rating: Option<u32>,
    /// `GameId` header, or the last path segment of `Site`.
    pub game_id: Option<String>,
}

impl Default for GameMetadata {
    fn default() -> Self {
        Self {
            white: "Unknown".to_string(),
            black: "Unknown".to_string(),
            result: "*".to_string(),
            white_rating: None,
            black_rating: None,
            game_id: None,
        }
    }
}

impl GameMetadata {
    /// Side that won the game according to the `Result` header.
    pub fn winner(&self) -> Option<Color> {
        match self.result.as_str() {
            "1-0" => Some(Color::White),
            "0-1" => Some(Color::Black),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    pub metadata: GameMetadata,
    pub moves: Vec<String>, // SAN notation, replay-validated
}

impl GameData {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Parse a rating header value. Anything that is not a positive integer is
/// treated as unrated.
pub fn parse_rating(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|r| *r > 0)
}
