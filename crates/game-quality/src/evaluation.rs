//! Engine evaluations and their normalization onto one centipawn scale.

use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::error::AnalysisError;
use crate::thresholds::{MATE_DISTANCE_STEP, MATE_SCORE_BASE, MAX_MATE_DISTANCE};

/// Player color as it appears in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// +1 for White, -1 for Black. Multiplying a White-positive value by this
    /// gives it from this side's point of view.
    pub fn sign(self) -> i32 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// Side to move at a given ply (ply 0 is White's first move).
    pub fn at_ply(ply: usize) -> Side {
        if ply % 2 == 0 {
            Side::White
        } else {
            Side::Black
        }
    }

    pub fn both() -> [Side; 2] {
        [Side::White, Side::Black]
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => f.write_str("white"),
            Side::Black => f.write_str("black"),
        }
    }
}

/// A position evaluation, always from White's point of view.
///
/// Serialized as `{"type": "cp" | "mate", "value": n}` where a mate value is
/// positive when White mates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEvaluation", into = "RawEvaluation")]
pub enum Evaluation {
    Centipawns(i32),
    /// `distance` 0 means the position is already checkmate.
    Mate { distance: u32, winner: Side },
}

impl Evaluation {
    /// Build from an engine-style `(kind, value)` pair where the value is
    /// White-positive. A bare `mate 0` carries no side and is read as Black
    /// mating, i.e. the bottom of the scale.
    pub fn from_raw(kind: &str, value: i32) -> Result<Self, AnalysisError> {
        match kind {
            "cp" => Ok(Evaluation::Centipawns(value)),
            "mate" => {
                let winner = if value > 0 { Side::White } else { Side::Black };
                Ok(Evaluation::Mate {
                    distance: value.unsigned_abs(),
                    winner,
                })
            }
            other => Err(AnalysisError::InvalidEvaluationKind(other.to_string())),
        }
    }

    pub fn is_mate(&self) -> bool {
        matches!(self, Evaluation::Mate { .. })
    }

    /// Engine-style signed value: centipawns, or mate distance signed toward
    /// the mating side.
    pub fn signed_value(&self) -> i32 {
        match *self {
            Evaluation::Centipawns(cp) => cp,
            Evaluation::Mate { distance, winner } => {
                winner.sign() * i32::try_from(distance).unwrap_or(i32::MAX)
            }
        }
    }

    /// Map onto the unified White-positive centipawn scale.
    ///
    /// Mate in N becomes `±(10000 - 10 * N)`, so nearer mates outrank farther
    /// ones and every mate outranks any material score.
    pub fn to_centipawns(&self) -> i32 {
        match *self {
            Evaluation::Centipawns(cp) => cp,
            Evaluation::Mate { distance, winner } => {
                // Bounded by MAX_MATE_DISTANCE, so the cast cannot truncate.
                let distance = distance.min(MAX_MATE_DISTANCE) as i32;
                winner.sign() * (MATE_SCORE_BASE - MATE_DISTANCE_STEP * distance)
            }
        }
    }

    /// Display form used in comeback reports: `M3` / `M-2` for mates, the
    /// integer centipawn value otherwise.
    pub fn display(&self) -> String {
        match self {
            Evaluation::Centipawns(cp) => cp.to_string(),
            Evaluation::Mate { .. } => format!("M{}", self.signed_value()),
        }
    }
}

/// Wire form of an [`Evaluation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvaluation {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: i32,
}

impl TryFrom<RawEvaluation> for Evaluation {
    type Error = AnalysisError;

    fn try_from(raw: RawEvaluation) -> Result<Self, Self::Error> {
        Evaluation::from_raw(&raw.kind, raw.value)
    }
}

impl From<Evaluation> for RawEvaluation {
    fn from(eval: Evaluation) -> Self {
        let kind = if eval.is_mate() { "mate" } else { "cp" };
        RawEvaluation {
            kind: kind.to_string(),
            value: eval.signed_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mate(distance: u32, winner: Side) -> Evaluation {
        Evaluation::Mate { distance, winner }
    }

    #[test]
    fn test_centipawns_unchanged() {
        assert_eq!(Evaluation::Centipawns(35).to_centipawns(), 35);
        assert_eq!(Evaluation::Centipawns(-420).to_centipawns(), -420);
    }

    #[test]
    fn test_mate_normalization() {
        assert_eq!(mate(1, Side::White).to_centipawns(), 9990);
        assert_eq!(mate(3, Side::Black).to_centipawns(), -9970);
        assert_eq!(mate(0, Side::White).to_centipawns(), 10_000);
    }

    #[test]
    fn test_mate_ordering() {
        assert!(mate(1, Side::White).to_centipawns() > mate(2, Side::White).to_centipawns());
        assert!(mate(2, Side::Black).to_centipawns() > mate(1, Side::Black).to_centipawns());
        assert!(mate(50, Side::White).to_centipawns() > 5000);
    }

    #[test]
    fn test_far_mate_keeps_sign() {
        assert!(mate(5000, Side::White).to_centipawns() > 0);
        assert!(mate(5000, Side::Black).to_centipawns() < 0);
    }

    #[test]
    fn test_from_raw() {
        assert_eq!(Evaluation::from_raw("cp", -12).unwrap(), Evaluation::Centipawns(-12));
        assert_eq!(Evaluation::from_raw("mate", -4).unwrap(), mate(4, Side::Black));
        let mated = Evaluation::from_raw("mate", 0).unwrap();
        assert_eq!(mated, mate(0, Side::Black));
        assert_eq!(mated.to_centipawns(), -10000);
        assert!(matches!(
            Evaluation::from_raw("wdl", 10),
            Err(AnalysisError::InvalidEvaluationKind(kind)) if kind == "wdl"
        ));
    }

    #[test]
    fn test_json_shape() {
        let eval: Evaluation = serde_json::from_str(r#"{"type": "mate", "value": 2}"#).unwrap();
        assert_eq!(eval, mate(2, Side::White));
        assert_eq!(
            serde_json::to_value(Evaluation::Centipawns(40)).unwrap(),
            serde_json::json!({"type": "cp", "value": 40})
        );
        assert!(serde_json::from_str::<Evaluation>(r#"{"type": "bogus", "value": 1}"#).is_err());

        let mated: Evaluation = serde_json::from_str(r#"{"type": "mate", "value": 0}"#).unwrap();
        assert_eq!(mated.to_centipawns(), -10000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Evaluation::Centipawns(-350).display(), "-350");
        assert_eq!(mate(3, Side::White).display(), "M3");
        assert_eq!(mate(2, Side::Black).display(), "M-2");
    }
}
