//! Centipawn to win% mapping (Lichess model, <https://lichess.org/page/accuracy>).

use crate::thresholds::WIN_PROBABILITY_SLOPE;

/// White's win percentage in `[0, 100]` for a White-positive centipawn value.
pub fn win_percentage(cp: i32) -> f64 {
    50.0 + 50.0 * (2.0 / (1.0 + (-WIN_PROBABILITY_SLOPE * f64::from(cp)).exp()) - 1.0)
}
