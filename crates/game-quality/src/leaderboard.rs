//! Cross-game leaderboard. A pure pass over finished game reports: each award
//! is one linear scan (White before Black within a game) where a challenger
//! only takes the award by strictly beating the current holder.

use serde::{Deserialize, Serialize};

use crate::analysis::round1;
use crate::evaluation::Side;
use crate::ranking::Leader;
use crate::report::{BlunderEvent, ComebackEvent, GameReport, LuckyEscapeEvent};
use crate::thresholds::SUPER_GM_RATING;

/// Which game an entry came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRef {
    pub white: String,
    pub black: String,
    #[serde(rename = "gameIndex")]
    pub game_index: usize,
    #[serde(rename = "gameId")]
    pub game_id: Option<String>,
}

impl GameRef {
    fn of(game: &GameReport) -> Self {
        Self {
            white: game.white.clone(),
            black: game.black.clone(),
            game_index: game.game_index,
            game_id: game.game_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyEntry {
    pub player: Side,
    pub accuracy: f64,
    pub acpl: f64,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcplEntry {
    pub player: Side,
    pub acpl: f64,
    pub accuracy: f64,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedAcplEntry {
    #[serde(rename = "combinedACPL")]
    pub combined_acpl: f64,
    #[serde(rename = "whiteACPL")]
    pub white_acpl: f64,
    #[serde(rename = "blackACPL")]
    pub black_acpl: f64,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlunderEntry {
    #[serde(flatten)]
    pub blunder: BlunderEvent,
    #[serde(flatten)]
    pub game: GameRef,
}

/// Worst blunder by a player rated at least [`SUPER_GM_RATING`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedBlunderEntry {
    #[serde(flatten)]
    pub blunder: BlunderEvent,
    pub rating: u32,
    pub player_name: String,
    pub white_rating: Option<u32>,
    pub black_rating: Option<u32>,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComebackEntry {
    #[serde(flatten)]
    pub comeback: ComebackEvent,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuckyEscapeEntry {
    #[serde(flatten)]
    pub escape: LuckyEscapeEvent,
    #[serde(flatten)]
    pub game: GameRef,
}

/// Most engine-level (excellent) moves by one player in one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineMovesEntry {
    pub player: Side,
    pub engine_moves: u32,
    pub total_moves: u32,
    /// Share of sampled moves, in percent
    pub percentage: f64,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InaccuracyEntry {
    pub player: Side,
    pub inaccuracies: u32,
    pub total_moves: u32,
    #[serde(flatten)]
    pub game: GameRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "accuracyKing")]
    pub accuracy_king: Option<AccuracyEntry>,
    #[serde(rename = "biggestBlunder")]
    pub biggest_blunder: Option<BlunderEntry>,
    #[serde(rename = "comebackKing")]
    pub comeback_king: Option<ComebackEntry>,
    #[serde(rename = "luckyEscape")]
    pub lucky_escape: Option<LuckyEscapeEntry>,
    #[serde(rename = "stockfishBuddy")]
    pub stockfish_buddy: Option<EngineMovesEntry>,
    #[serde(rename = "inaccuracyKing")]
    pub inaccuracy_king: Option<InaccuracyEntry>,
    #[serde(rename = "lowestACPL")]
    pub lowest_acpl: Option<AcplEntry>,
    #[serde(rename = "highestACPL")]
    pub highest_acpl: Option<AcplEntry>,
    #[serde(rename = "lowestCombinedACPL")]
    pub lowest_combined_acpl: Option<CombinedAcplEntry>,
    #[serde(rename = "highestCombinedACPL")]
    pub highest_combined_acpl: Option<CombinedAcplEntry>,
    #[serde(rename = "notSoSuperGM")]
    pub not_so_super_gm: Option<RatedBlunderEntry>,
}

/// Full output document: every analyzed game plus the awards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub games: Vec<GameReport>,
    pub summary: Summary,
}

fn acpl_entry(game: &GameReport, side: Side) -> AcplEntry {
    AcplEntry {
        player: side,
        acpl: game.acpl(side),
        accuracy: game.accuracy(side),
        game: GameRef::of(game),
    }
}

fn combined_acpl_entry(game: &GameReport) -> CombinedAcplEntry {
    CombinedAcplEntry {
        combined_acpl: round1(game.white_acpl + game.black_acpl),
        white_acpl: game.white_acpl,
        black_acpl: game.black_acpl,
        game: GameRef::of(game),
    }
}

fn engine_moves_entry(game: &GameReport, side: Side) -> EngineMovesEntry {
    let engine_moves = game.engine_moves(side);
    let total_moves = game.move_quality(side).total();
    let percentage = if total_moves > 0 {
        round1(f64::from(engine_moves) / f64::from(total_moves) * 100.0)
    } else {
        0.0
    };
    EngineMovesEntry {
        player: side,
        engine_moves,
        total_moves,
        percentage,
        game: GameRef::of(game),
    }
}

/// The blunderer's rating when it clears the strong-player gate.
fn rated_blunder_entry(game: &GameReport, blunder: &BlunderEvent) -> Option<RatedBlunderEntry> {
    let rating = game
        .rating(blunder.player)
        .filter(|rating| *rating >= SUPER_GM_RATING)?;

    Some(RatedBlunderEntry {
        blunder: blunder.clone(),
        rating,
        player_name: game.player(blunder.player).to_string(),
        white_rating: game.white_rating,
        black_rating: game.black_rating,
        game: GameRef::of(game),
    })
}

/// Compute every award over `games`, in order. Pure: the same input always
/// gives the same summary.
pub fn build_summary(games: &[GameReport]) -> Summary {
    let mut accuracy_king = Leader::highest();
    let mut lowest_acpl = Leader::lowest();
    let mut highest_acpl = Leader::highest();
    let mut lowest_combined = Leader::lowest();
    let mut highest_combined = Leader::highest();
    let mut biggest_blunder = Leader::highest();
    let mut comeback_king = Leader::highest();
    let mut lucky_escape = Leader::highest();
    let mut stockfish_buddy = Leader::highest();
    let mut inaccuracy_king = Leader::highest();
    let mut not_so_super_gm = Leader::highest();

    for game in games {
        for side in Side::both() {
            accuracy_king.offer(
                AccuracyEntry {
                    player: side,
                    accuracy: game.accuracy(side),
                    acpl: game.acpl(side),
                    game: GameRef::of(game),
                },
                |e: &AccuracyEntry| e.accuracy,
            );
            lowest_acpl.offer(acpl_entry(game, side), |e: &AcplEntry| e.acpl);
            highest_acpl.offer(acpl_entry(game, side), |e: &AcplEntry| e.acpl);
        }

        lowest_combined.offer(combined_acpl_entry(game), |e: &CombinedAcplEntry| e.combined_acpl);
        highest_combined.offer(combined_acpl_entry(game), |e: &CombinedAcplEntry| e.combined_acpl);

        if let Some(blunder) = &game.biggest_blunder {
            biggest_blunder.offer(
                BlunderEntry {
                    blunder: blunder.clone(),
                    game: GameRef::of(game),
                },
                |e: &BlunderEntry| e.blunder.severity,
            );
            if let Some(entry) = rated_blunder_entry(game, blunder) {
                not_so_super_gm.offer(entry, |e: &RatedBlunderEntry| e.blunder.severity);
            }
        }

        if let Some(comeback) = &game.biggest_comeback {
            comeback_king.offer(
                ComebackEntry {
                    comeback: comeback.clone(),
                    game: GameRef::of(game),
                },
                |e: &ComebackEntry| e.comeback.swing,
            );
        }

        if let Some(escape) = &game.lucky_escape {
            lucky_escape.offer(
                LuckyEscapeEntry {
                    escape: escape.clone(),
                    game: GameRef::of(game),
                },
                |e: &LuckyEscapeEntry| e.escape.escape_amount,
            );
        }

        for side in Side::both() {
            stockfish_buddy.offer(engine_moves_entry(game, side), |e: &EngineMovesEntry| {
                e.engine_moves
            });
            inaccuracy_king.offer(
                InaccuracyEntry {
                    player: side,
                    inaccuracies: game.move_quality(side).inaccuracies,
                    total_moves: game.move_quality(side).total(),
                    game: GameRef::of(game),
                },
                |e: &InaccuracyEntry| e.inaccuracies,
            );
        }
    }

    Summary {
        accuracy_king: accuracy_king.into_inner(),
        biggest_blunder: biggest_blunder.into_inner(),
        comeback_king: comeback_king.into_inner(),
        lucky_escape: lucky_escape.into_inner(),
        stockfish_buddy: stockfish_buddy.into_inner(),
        inaccuracy_king: inaccuracy_king.into_inner(),
        lowest_acpl: lowest_acpl.into_inner(),
        highest_acpl: highest_acpl.into_inner(),
        lowest_combined_acpl: lowest_combined.into_inner(),
        highest_combined_acpl: highest_combined.into_inner(),
        not_so_super_gm: not_so_super_gm.into_inner(),
    }
}

/// Wrap finished reports with their summary.
pub fn aggregate(games: Vec<GameReport>) -> AnalysisOutput {
    let summary = build_summary(&games);
    AnalysisOutput { games, summary }
}
