//! Per-game driver: replays each game, queries the evaluator for the
//! positions the sampling policy needs, and feeds the accumulator.

use chess_core::GameData;
use shakmaty::san::SanPlus;
use shakmaty::{Chess, Position};
use tracing::{debug, info, warn};

use crate::accumulator::{GameAccumulator, GameContext, ScoredPly};
use crate::error::AnalysisError;
use crate::evaluation::{Evaluation, Side};
use crate::evaluator::PositionEvaluator;
use crate::leaderboard::{aggregate, AnalysisOutput};
use crate::report::GameReport;

/// Every position of a game, starting position first.
fn replay(moves: &[String]) -> Result<Vec<Chess>, AnalysisError> {
    let mut board = Chess::default();
    let mut positions = Vec::with_capacity(moves.len() + 1);
    positions.push(board.clone());

    for (i, san) in moves.iter().enumerate() {
        let illegal = || AnalysisError::IllegalMove {
            ply: i + 1,
            san: san.clone(),
        };
        let san_plus: SanPlus = san.parse().map_err(|_| illegal())?;
        let mv = san_plus.san.to_move(&board).map_err(|_| illegal())?;
        board.play_unchecked(mv);
        positions.push(board.clone());
    }

    Ok(positions)
}

/// Evaluations of a game's positions, each queried at most once.
struct PositionEvaluations<'a, E> {
    evaluator: &'a mut E,
    positions: &'a [Chess],
    cache: Vec<Option<Evaluation>>,
}

impl<'a, E: PositionEvaluator> PositionEvaluations<'a, E> {
    fn new(evaluator: &'a mut E, positions: &'a [Chess]) -> Self {
        Self {
            evaluator,
            positions,
            cache: vec![None; positions.len()],
        }
    }

    async fn at(&mut self, index: usize) -> Result<Evaluation, AnalysisError> {
        if let Some(evaluation) = self.cache[index] {
            return Ok(evaluation);
        }

        let position = &self.positions[index];
        let evaluation = if position.is_checkmate() {
            // The engine has no move to search here
            Evaluation::Mate {
                distance: 0,
                winner: Side::from(position.turn()).opponent(),
            }
        } else {
            self.evaluator.evaluate(position).await?
        };

        self.cache[index] = Some(evaluation);
        Ok(evaluation)
    }
}

/// Analyze one game. Games without moves are skipped and yield `None`.
pub async fn analyze_game<E: PositionEvaluator>(
    evaluator: &mut E,
    game: &GameData,
    game_index: usize,
    sample_rate: u32,
) -> Result<Option<GameReport>, AnalysisError> {
    let metadata = &game.metadata;
    if game.is_empty() {
        info!(game_index, white = %metadata.white, black = %metadata.black, "Skipping game with no moves");
        return Ok(None);
    }

    info!(
        game_index,
        white = %metadata.white,
        black = %metadata.black,
        moves = game.moves.len(),
        "Analyzing game"
    );

    let positions = replay(&game.moves)?;
    let mut evaluations = PositionEvaluations::new(evaluator, &positions);
    let mut accumulator = GameAccumulator::new(sample_rate);

    for (ply, notation) in game.moves.iter().enumerate() {
        if !accumulator.is_sampled(ply) {
            continue;
        }
        let before = evaluations.at(ply).await?;
        let after = evaluations.at(ply + 1).await?;
        accumulator.record(ScoredPly {
            ply,
            notation: notation.clone(),
            before,
            after,
        });
    }

    let context = GameContext::from_metadata(game_index, metadata);
    let final_evaluation = match context.winner {
        Some(winner) if accumulator.is_comeback_candidate(winner) => {
            Some(evaluations.at(positions.len() - 1).await?)
        }
        _ => None,
    };

    let report = accumulator.finish(context, final_evaluation);
    debug!(
        game_index,
        white_accuracy = report.white_accuracy,
        black_accuracy = report.black_accuracy,
        "Game analyzed"
    );
    Ok(Some(report))
}

/// Analyze every game in order and build the cross-game summary. A game's
/// index is its position in `games`, skipped games included.
///
/// A game with an illegal move or an unknown evaluation kind is left out of
/// the output; engine failures abort the whole run.
pub async fn analyze_games<E: PositionEvaluator>(
    evaluator: &mut E,
    games: &[GameData],
    sample_rate: u32,
) -> Result<AnalysisOutput, AnalysisError> {
    let mut reports = Vec::with_capacity(games.len());
    for (game_index, game) in games.iter().enumerate() {
        match analyze_game(evaluator, game, game_index, sample_rate).await {
            Ok(Some(report)) => reports.push(report),
            Ok(None) => {}
            // Bad data in one game only costs that game
            Err(
                e @ (AnalysisError::InvalidEvaluationKind(_) | AnalysisError::IllegalMove { .. }),
            ) => {
                warn!(game_index, error = %e, "Skipping game");
            }
            Err(e) => return Err(e),
        }
    }

    info!(analyzed = reports.len(), total = games.len(), "Analysis complete");
    Ok(aggregate(reports))
}
