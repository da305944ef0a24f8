//! Classification policy constants.
//!
//! Everything that decides what counts as a blunder, how severe it is, and
//! what shows up on a leaderboard lives here so the policy can be tuned in one
//! place.

// ---------------------------------------------------------------------------
// Evaluation scale
// ---------------------------------------------------------------------------

/// Normalized value of an immediate mate. Far outside any material score.
pub const MATE_SCORE_BASE: i32 = 10_000;

/// Each extra move to mate lowers the normalized value by this much, so
/// mate-in-1 ranks above mate-in-2.
pub const MATE_DISTANCE_STEP: i32 = 10;

/// Largest mate distance that still maps strictly above zero.
pub const MAX_MATE_DISTANCE: u32 = ((MATE_SCORE_BASE / MATE_DISTANCE_STEP) - 1) as u32;

// ---------------------------------------------------------------------------
// Win probability (Lichess logistic model)
// ---------------------------------------------------------------------------

/// Slope of the logistic curve mapping centipawns to win%.
pub const WIN_PROBABILITY_SLOPE: f64 = 0.003_682_08;

// ---------------------------------------------------------------------------
// Move classification, upper bounds (exclusive) on win% loss
// ---------------------------------------------------------------------------

pub const EXCELLENT_MAX_WIN_LOSS: f64 = 2.0;
pub const GOOD_MAX_WIN_LOSS: f64 = 5.0;
pub const INACCURACY_MAX_WIN_LOSS: f64 = 10.0;
pub const MISTAKE_MAX_WIN_LOSS: f64 = 20.0;

/// A mover whose own win% was at or below this before the move was already
/// lost; large swings are downgraded from blunder to mistake.
pub const DECIDED_LOSING_WIN_PCT: f64 = 10.0;

/// A mover whose own win% was at or above this was already winning.
pub const DECIDED_WINNING_WIN_PCT: f64 = 90.0;

// ---------------------------------------------------------------------------
// Accuracy (Lichess formula)
// ---------------------------------------------------------------------------

pub const ACCURACY_SCALE: f64 = 103.1668;
pub const ACCURACY_DECAY: f64 = 0.04354;
pub const ACCURACY_OFFSET: f64 = 3.1669;

// ---------------------------------------------------------------------------
// ACPL
// ---------------------------------------------------------------------------

/// Per-move loss cap before averaging. ACPL tracks typical play, so a few
/// outlier blunders must not dominate it.
pub const ACPL_LOSS_CAP: i32 = 150;

// ---------------------------------------------------------------------------
// Blunder severity
// ---------------------------------------------------------------------------

/// Mate-after penalty is `MATE_PENALTY / (distance + 1)`: M1 adds 50.
pub const MATE_PENALTY: f64 = 100.0;

/// Pre-move advantage (cp) above which squandering it scales severity.
pub const WINNING_MARGIN_CP: i32 = 200;

/// Each additional 400 cp of prior advantage adds 1x to the multiplier.
pub const MARGIN_SCALE_CP: f64 = 400.0;

/// The margin multiplier tops out at 1 + this (3x, reached at 600 cp).
pub const MAX_EXTRA_MARGIN_MULTIPLIER: f64 = 2.0;

/// Throwing away a forced mate.
pub const LOST_MATE_MULTIPLIER: f64 = 3.0;

// ---------------------------------------------------------------------------
// Lucky escape and comeback
// ---------------------------------------------------------------------------

/// Advantage (cp) the opponent must have held on the previous ply.
pub const ESCAPE_ADVANTAGE_CP: i32 = 200;

/// The evaluation must come back within this distance of neutral.
pub const ESCAPE_NEUTRAL_CP: i32 = 50;

/// The eventual winner must have been worse than this (cp) at some point.
pub const LOSING_THRESHOLD_CP: i32 = 200;

/// Comeback swings are capped so mate scores don't produce absurd values.
pub const MAX_COMEBACK_SWING_CP: i32 = 2000;

// ---------------------------------------------------------------------------
// Leaderboards
// ---------------------------------------------------------------------------

/// Minimum rating of the blunderer for the strong-player blunder award.
pub const SUPER_GM_RATING: u32 = 2600;
