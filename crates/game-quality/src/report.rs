//! Per-game report types. Field names are the stable JSON output contract.

use serde::{Deserialize, Serialize};

use crate::analysis::MoveQualityCounts;
use crate::evaluation::Side;

/// One sampled ply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub ply: usize, // 1-indexed
    pub move_number: usize,
    pub color: Side,
    #[serde(rename = "move")]
    pub notation: String,
    /// Pawns, White-positive
    pub eval_before: f64,
    pub eval_after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlunderEvent {
    pub move_number: usize,
    pub player: Side,
    /// 0 when either evaluation was a mate score
    pub cp_loss: i32,
    pub win_loss: f64,
    pub severity: f64,
    #[serde(rename = "move")]
    pub notation: String,
    /// Normalized centipawns, White-positive
    pub eval_before: i32,
    pub eval_after: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComebackEvent {
    pub player: Side,
    pub swing: i32,
    pub eval_from: String,
    pub eval_to: String,
    pub eval_from_cp: i32,
    pub eval_to_cp: i32,
    /// Move at which the winner's position was worst
    pub move_number: usize,
}

/// The opponent held a big advantage and let it slip back toward equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuckyEscapeEvent {
    /// The side that escaped
    pub player: Side,
    pub escape_amount: i32,
    pub eval_before: i32,
    pub eval_after: i32,
    pub move_number: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameReport {
    #[serde(rename = "gameIndex")]
    pub game_index: usize,
    #[serde(rename = "gameId")]
    pub game_id: Option<String>,
    pub white: String,
    pub black: String,
    #[serde(rename = "whiteRating")]
    pub white_rating: Option<u32>,
    #[serde(rename = "blackRating")]
    pub black_rating: Option<u32>,
    #[serde(rename = "whiteACPL")]
    pub white_acpl: f64,
    #[serde(rename = "blackACPL")]
    pub black_acpl: f64,
    #[serde(rename = "whiteAccuracy")]
    pub white_accuracy: f64,
    #[serde(rename = "blackAccuracy")]
    pub black_accuracy: f64,
    #[serde(rename = "whiteMoveQuality")]
    pub white_move_quality: MoveQualityCounts,
    #[serde(rename = "blackMoveQuality")]
    pub black_move_quality: MoveQualityCounts,
    #[serde(rename = "whiteEngineMoves")]
    pub white_engine_moves: u32,
    #[serde(rename = "blackEngineMoves")]
    pub black_engine_moves: u32,
    #[serde(rename = "biggestBlunder")]
    pub biggest_blunder: Option<BlunderEvent>,
    #[serde(rename = "biggestComeback")]
    pub biggest_comeback: Option<ComebackEvent>,
    #[serde(rename = "luckyEscape")]
    pub lucky_escape: Option<LuckyEscapeEvent>,
    #[serde(rename = "moveTimes")]
    pub move_times: Vec<MoveRecord>,
}

impl GameReport {
    pub fn player(&self, side: Side) -> &str {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    pub fn rating(&self, side: Side) -> Option<u32> {
        match side {
            Side::White => self.white_rating,
            Side::Black => self.black_rating,
        }
    }

    pub fn accuracy(&self, side: Side) -> f64 {
        match side {
            Side::White => self.white_accuracy,
            Side::Black => self.black_accuracy,
        }
    }

    pub fn acpl(&self, side: Side) -> f64 {
        match side {
            Side::White => self.white_acpl,
            Side::Black => self.black_acpl,
        }
    }

    pub fn move_quality(&self, side: Side) -> &MoveQualityCounts {
        match side {
            Side::White => &self.white_move_quality,
            Side::Black => &self.black_move_quality,
        }
    }

    pub fn engine_moves(&self, side: Side) -> u32 {
        match side {
            Side::White => self.white_engine_moves,
            Side::Black => self.black_engine_moves,
        }
    }
}
