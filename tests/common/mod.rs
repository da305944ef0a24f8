use std::collections::HashMap;

use game_quality::{AnalysisError, Evaluation, PositionEvaluator};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{Chess, EnPassantMode, Position};

fn fen_key(position: &Chess) -> String {
    Fen::from_position(position, EnPassantMode::Legal).to_string()
}

/// Evaluator answering from a table of positions, so tests run without a
/// Stockfish binary. Unknown positions are an engine error, or a score of
/// `unscripted_kind` when one is set.
#[derive(Default)]
pub struct ScriptedEvaluator {
    table: HashMap<String, Evaluation>,
    unscripted_kind: Option<String>,
    pub calls: usize,
}

impl ScriptedEvaluator {
    /// Answer unknown positions with an engine-style score of `kind`.
    pub fn unscripted_kind(mut self, kind: &str) -> Self {
        self.unscripted_kind = Some(kind.to_string());
        self
    }

    /// Script a line: `evals[i]` is the evaluation after `moves[..i]`.
    pub fn line(mut self, moves: &[&str], evals: &[Evaluation]) -> Self {
        assert_eq!(evals.len(), moves.len() + 1, "one evaluation per position");
        let mut board = Chess::default();
        self.insert(&board, evals[0]);
        for (san, eval) in moves.iter().zip(&evals[1..]) {
            let san: SanPlus = san.parse().expect("valid SAN");
            let mv = san.san.to_move(&board).expect("legal move");
            board.play_unchecked(mv);
            self.insert(&board, *eval);
        }
        self
    }

    /// Same as [`ScriptedEvaluator::line`] with plain centipawn values.
    pub fn cp_line(self, moves: &[&str], cps: &[i32]) -> Self {
        let evals: Vec<Evaluation> = cps.iter().map(|&cp| Evaluation::Centipawns(cp)).collect();
        self.line(moves, &evals)
    }

    fn insert(&mut self, position: &Chess, eval: Evaluation) {
        if let Some(existing) = self.table.insert(fen_key(position), eval) {
            assert_eq!(existing, eval, "conflicting evaluations for a shared position");
        }
    }
}

impl PositionEvaluator for ScriptedEvaluator {
    async fn evaluate(&mut self, position: &Chess) -> Result<Evaluation, AnalysisError> {
        self.calls += 1;
        let key = fen_key(position);
        match (self.table.get(&key), &self.unscripted_kind) {
            (Some(eval), _) => Ok(*eval),
            (None, Some(kind)) => Evaluation::from_raw(kind, 5),
            (None, None) => Err(AnalysisError::Stockfish(format!("unscripted position {key}"))),
        }
    }
}
