//! PGN game source built on pgn-reader.
//!
//! Every game in the stream becomes a [`GameData`]. Moves are replayed with
//! shakmaty while reading, so downstream code only ever sees legal moves in
//! normalized SAN (with `+`/`#` suffixes recomputed from the position).

use std::io::Read;
use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{san::San, Chess, Position};
use tracing::warn;

use crate::error::GameSourceError;
use crate::game_data::{parse_rating, GameData, GameMetadata};

/// Header values collected before the movetext starts.
#[derive(Default)]
struct PendingTags {
    metadata: GameMetadata,
    site: Option<String>,
}

/// Movetext state for the game currently being read.
struct GameState {
    metadata: GameMetadata,
    board: Chess,
    moves: Vec<String>,
    /// Set once a move fails to replay; later moves are ignored.
    broken: bool,
}

/// Visitor that collects every game of a PGN stream.
#[derive(Default)]
struct GameCollector {
    games: Vec<GameData>,
}

impl Visitor for GameCollector {
    type Tags = PendingTags;
    type Movetext = GameState;
    type Output = ();

    fn begin_tags(&mut self) -> ControlFlow<(), PendingTags> {
        ControlFlow::Continue(PendingTags::default())
    }

    fn tag(&mut self, tags: &mut PendingTags, name: &[u8], value: RawTag<'_>) -> ControlFlow<()> {
        let value = value.decode_utf8_lossy().to_string();
        match name {
            b"White" => tags.metadata.white = value,
            b"Black" => tags.metadata.black = value,
            b"Result" => tags.metadata.result = value,
            b"WhiteElo" => tags.metadata.white_rating = parse_rating(&value),
            b"BlackElo" => tags.metadata.black_rating = parse_rating(&value),
            b"GameId" if !value.is_empty() => tags.metadata.game_id = Some(value),
            b"Site" if !value.is_empty() => tags.site = Some(value),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: PendingTags) -> ControlFlow<(), GameState> {
        let mut metadata = tags.metadata;
        if metadata.game_id.is_none() {
            metadata.game_id = tags.site.as_deref().map(game_id_from_site);
        }

        ControlFlow::Continue(GameState {
            metadata,
            board: Chess::default(),
            moves: Vec::new(),
            broken: false,
        })
    }

    fn begin_variation(&mut self, _state: &mut GameState) -> ControlFlow<(), Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn san(&mut self, state: &mut GameState, san_plus: SanPlus) -> ControlFlow<()> {
        if state.broken {
            return ControlFlow::Continue(());
        }

        match san_plus.san.to_move(&state.board) {
            Ok(mv) => {
                let san = San::from_move(&state.board, mv).to_string();
                state.board.play_unchecked(mv);
                let suffix = if state.board.is_checkmate() {
                    "#"
                } else if state.board.is_check() {
                    "+"
                } else {
                    ""
                };
                state.moves.push(format!("{san}{suffix}"));
            }
            Err(_) => {
                warn!(
                    white = %state.metadata.white,
                    black = %state.metadata.black,
                    ply = state.moves.len() + 1,
                    san = %san_plus,
                    "Illegal move in PGN, truncating game"
                );
                state.broken = true;
            }
        }

        ControlFlow::Continue(())
    }

    fn end_game(&mut self, state: GameState) {
        self.games.push(GameData {
            metadata: state.metadata,
            moves: state.moves,
        });
    }
}

/// `https://lichess.org/abcd1234` -> `abcd1234`
fn game_id_from_site(site: &str) -> String {
    site.rsplit('/').next().unwrap_or(site).to_string()
}

/// Read every game from a PGN stream, in order.
pub fn read_games<R: Read>(reader: R) -> Result<Vec<GameData>, GameSourceError> {
    let mut collector = GameCollector::default();
    let mut pgn_reader = Reader::new(reader);
    while pgn_reader.read_game(&mut collector)?.is_some() {}
    Ok(collector.games)
}

/// Read every game from PGN text.
pub fn parse_pgn(pgn: &str) -> Result<Vec<GameData>, GameSourceError> {
    read_games(pgn.as_bytes())
}
