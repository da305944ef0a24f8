/// Move classification and per-player scoring: pure functions only
/// (No Board/Engine/Game dependencies)

use serde::{Deserialize, Serialize};

use crate::evaluation::Side;
use crate::thresholds::{
    ACCURACY_DECAY, ACCURACY_OFFSET, ACCURACY_SCALE, ACPL_LOSS_CAP, DECIDED_LOSING_WIN_PCT,
    DECIDED_WINNING_WIN_PCT, EXCELLENT_MAX_WIN_LOSS, GOOD_MAX_WIN_LOSS, INACCURACY_MAX_WIN_LOSS,
    MISTAKE_MAX_WIN_LOSS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveQuality {
    Excellent,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
}

impl MoveQuality {
    /// Histogram key as it appears in reports.
    pub fn label(self) -> &'static str {
        match self {
            MoveQuality::Excellent => "excellent",
            MoveQuality::Good => "good",
            MoveQuality::Inaccuracy => "inaccuracies",
            MoveQuality::Mistake => "mistakes",
            MoveQuality::Blunder => "blunders",
        }
    }
}

/// Per-player move-quality histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveQualityCounts {
    pub blunders: u32,
    pub mistakes: u32,
    pub inaccuracies: u32,
    pub good: u32,
    pub excellent: u32,
}

impl MoveQualityCounts {
    pub fn record(&mut self, quality: MoveQuality) {
        match quality {
            MoveQuality::Excellent => self.excellent += 1,
            MoveQuality::Good => self.good += 1,
            MoveQuality::Inaccuracy => self.inaccuracies += 1,
            MoveQuality::Mistake => self.mistakes += 1,
            MoveQuality::Blunder => self.blunders += 1,
        }
    }

    /// Number of classified (sampled) moves.
    pub fn total(&self) -> u32 {
        self.blunders + self.mistakes + self.inaccuracies + self.good + self.excellent
    }
}

/// Classify a move from White-perspective win% before and after it.
///
/// Returns the quality bucket and the mover's own win% loss (never negative).
/// Lichess thresholds; see
/// <https://github.com/lichess-org/lila/blob/master/modules/analyse/src/main/AccuracyPercent.scala>.
pub fn classify_move(win_before: f64, win_after: f64, mover: Side) -> (MoveQuality, f64) {
    let (own_before, own_after) = match mover {
        Side::White => (win_before, win_after),
        Side::Black => (100.0 - win_before, 100.0 - win_after),
    };
    let win_loss = (own_before - own_after).max(0.0);

    let quality = if win_loss < EXCELLENT_MAX_WIN_LOSS {
        MoveQuality::Excellent
    } else if win_loss < GOOD_MAX_WIN_LOSS {
        MoveQuality::Good
    } else if win_loss < INACCURACY_MAX_WIN_LOSS {
        MoveQuality::Inaccuracy
    } else if win_loss < MISTAKE_MAX_WIN_LOSS {
        MoveQuality::Mistake
    } else if own_before > DECIDED_LOSING_WIN_PCT && own_before < DECIDED_WINNING_WIN_PCT {
        MoveQuality::Blunder
    } else {
        // Already decided before the move: a big swing changes nothing
        MoveQuality::Mistake
    };

    (quality, win_loss)
}

/// Lichess accuracy from a player's win% losses. No moves means 100.
pub fn calculate_accuracy(win_losses: &[f64]) -> f64 {
    if win_losses.is_empty() {
        return 100.0;
    }
    let avg_loss = win_losses.iter().sum::<f64>() / win_losses.len() as f64;
    let accuracy = ACCURACY_SCALE * (-ACCURACY_DECAY * avg_loss).exp() - ACCURACY_OFFSET;
    accuracy.clamp(0.0, 100.0)
}

/// Centipawn loss from the mover's perspective (White-positive inputs).
pub fn calculate_cp_loss(cp_before: i32, cp_after: i32, mover: Side) -> i32 {
    (mover.sign() * (cp_before - cp_after)).max(0)
}

/// Mean of per-move losses after capping each at [`ACPL_LOSS_CAP`]. No
/// losses means 0.
pub fn calculate_acpl(cp_losses: &[i32]) -> f64 {
    if cp_losses.is_empty() {
        return 0.0;
    }
    let total: i64 = cp_losses
        .iter()
        .map(|loss| i64::from((*loss).min(ACPL_LOSS_CAP)))
        .sum();
    total as f64 / cp_losses.len() as f64
}

/// Round to one decimal, the precision reports carry.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
