//! The seam between game replay and whatever produces evaluations.

use shakmaty::Chess;

use crate::error::AnalysisError;
use crate::evaluation::Evaluation;

/// Something that can score a position. Queries for one game are strictly
/// serial: each position is reached by the previous move.
#[allow(async_fn_in_trait)]
pub trait PositionEvaluator {
    /// White-perspective evaluation of `position`.
    async fn evaluate(&mut self, position: &Chess) -> Result<Evaluation, AnalysisError>;
}
