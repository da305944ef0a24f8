//! JSON game source: a list of games carrying their own metadata plus PGN.
//!
//! ```json
//! {"games": [{"gameIndex": 0, "white": "A", "black": "B",
//!             "whiteRating": 2710, "blackRating": null, "pgn": "1. e4 ..."}]}
//! ```
//!
//! Games come out in entry order. Each entry's metadata applies to the game
//! at its `gameIndex`, or at the entry's own position when that is absent.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::GameSourceError;
use crate::game_data::{GameData, GameMetadata};
use crate::pgn::parse_pgn;

#[derive(Debug, Deserialize)]
struct JsonInput {
    #[serde(default)]
    games: Vec<JsonGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonGame {
    #[serde(default)]
    game_index: Option<usize>,
    #[serde(default)]
    white: Option<String>,
    #[serde(default)]
    black: Option<String>,
    #[serde(default)]
    white_rating: Value,
    #[serde(default)]
    black_rating: Value,
    #[serde(default)]
    pgn: String,
}

/// Ratings in JSON input arrive as numbers, numeric strings, or null.
fn rating_from_value(value: &Value) -> Option<u32> {
    let rating = match value {
        Value::Number(n) => n.as_u64().and_then(|r| u32::try_from(r).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    rating.filter(|r| *r > 0)
}

/// Parse JSON input into games, one per entry, in input order.
///
/// Ratings from the JSON metadata take precedence over PGN `WhiteElo` and
/// `BlackElo` headers. Player names only fill in for missing PGN headers.
pub fn parse_json_games(text: &str) -> Result<Vec<GameData>, GameSourceError> {
    let input: JsonInput = serde_json::from_str(text)?;

    let mut games = Vec::with_capacity(input.games.len());
    for entry in &input.games {
        let game = parse_pgn(&entry.pgn)?
            .into_iter()
            .next()
            .unwrap_or_else(|| GameData {
                metadata: GameMetadata::default(),
                moves: Vec::new(),
            });
        games.push(game);
    }

    for (position, entry) in input.games.into_iter().enumerate() {
        let index = entry.game_index.unwrap_or(position);
        match games.get_mut(index) {
            Some(game) => apply_metadata(&mut game.metadata, entry),
            None => warn!(game_index = index, "JSON metadata for a game that does not exist"),
        }
    }

    Ok(games)
}

fn apply_metadata(metadata: &mut GameMetadata, entry: JsonGame) {
    let defaults = GameMetadata::default();
    if let Some(white) = entry.white.filter(|_| metadata.white == defaults.white) {
        metadata.white = white;
    }
    if let Some(black) = entry.black.filter(|_| metadata.black == defaults.black) {
        metadata.black = black;
    }
    if let Some(rating) = rating_from_value(&entry.white_rating) {
        metadata.white_rating = Some(rating);
    }
    if let Some(rating) = rating_from_value(&entry.black_rating) {
        metadata.black_rating = Some(rating);
    }
}
