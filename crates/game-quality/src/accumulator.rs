//! Single-pass per-game accumulation.
//!
//! A [`GameAccumulator`] is fed sampled plies in order while the game is
//! scanned, then consumed by [`GameAccumulator::finish`] to produce the
//! immutable [`GameReport`].

use chess_core::GameMetadata;
use tracing::debug;

use crate::analysis::{
    calculate_accuracy, calculate_acpl, calculate_cp_loss, classify_move, round1, MoveQuality,
    MoveQualityCounts,
};
use crate::evaluation::{Evaluation, Side};
use crate::ranking::Leader;
use crate::report::{BlunderEvent, ComebackEvent, GameReport, LuckyEscapeEvent, MoveRecord};
use crate::severity::blunder_severity;
use crate::thresholds::{
    ESCAPE_ADVANTAGE_CP, ESCAPE_NEUTRAL_CP, LOSING_THRESHOLD_CP, MAX_COMEBACK_SWING_CP,
};
use crate::win_probability::win_percentage;

/// Evaluations around one sampled move, both White-perspective.
#[derive(Debug, Clone)]
pub struct ScoredPly {
    pub ply: usize, // 0-indexed
    pub notation: String,
    pub before: Evaluation,
    pub after: Evaluation,
}

/// Identifying metadata copied into the report.
#[derive(Debug, Clone)]
pub struct GameContext {
    pub game_index: usize,
    pub game_id: Option<String>,
    pub white: String,
    pub black: String,
    pub white_rating: Option<u32>,
    pub black_rating: Option<u32>,
    pub winner: Option<Side>,
}

impl GameContext {
    pub fn from_metadata(game_index: usize, metadata: &GameMetadata) -> Self {
        Self {
            game_index,
            game_id: metadata.game_id.clone(),
            white: metadata.white.clone(),
            black: metadata.black.clone(),
            white_rating: metadata.white_rating,
            black_rating: metadata.black_rating,
            winner: metadata.winner().map(Side::from),
        }
    }
}

#[derive(Debug, Default)]
struct PlayerTally {
    win_losses: Vec<f64>,
    cp_losses: Vec<i32>,
    quality: MoveQualityCounts,
}

/// A post-move evaluation at the move where it occurred.
#[derive(Debug, Clone)]
struct EvalExtreme {
    cp: i32,
    evaluation: Evaluation,
    move_number: usize,
}

pub struct GameAccumulator {
    sample_rate: usize,
    white: PlayerTally,
    black: PlayerTally,
    biggest_blunder: Leader<BlunderEvent>,
    lucky_escape: Leader<LuckyEscapeEvent>,
    /// Post-move evaluation of the previous sampled ply
    previous_cp: Option<i32>,
    lowest: Leader<EvalExtreme>,
    highest: Leader<EvalExtreme>,
    moves: Vec<MoveRecord>,
}

impl GameAccumulator {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1) as usize,
            white: PlayerTally::default(),
            black: PlayerTally::default(),
            biggest_blunder: Leader::highest(),
            lucky_escape: Leader::highest(),
            previous_cp: None,
            lowest: Leader::lowest(),
            highest: Leader::highest(),
            moves: Vec::new(),
        }
    }

    /// Every Nth move of each color is scored: plies 0,1 then 2N,2N+1, ...
    pub fn is_sampled(&self, ply: usize) -> bool {
        (ply / 2) % self.sample_rate == 0
    }

    fn tally_mut(&mut self, side: Side) -> &mut PlayerTally {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }

    pub fn record(&mut self, scored: ScoredPly) {
        let mover = Side::at_ply(scored.ply);
        let move_number = scored.ply / 2 + 1;
        let cp_before = scored.before.to_centipawns();
        let cp_after = scored.after.to_centipawns();

        self.moves.push(MoveRecord {
            ply: scored.ply + 1,
            move_number,
            color: mover,
            notation: scored.notation.clone(),
            eval_before: f64::from(cp_before) / 100.0,
            eval_after: f64::from(cp_after) / 100.0,
        });

        // Mate transitions would swamp the mean with synthetic values
        let cp_loss = (!scored.before.is_mate() && !scored.after.is_mate())
            .then(|| calculate_cp_loss(cp_before, cp_after, mover));

        let (quality, win_loss) =
            classify_move(win_percentage(cp_before), win_percentage(cp_after), mover);

        debug!(
            move_number,
            player = %mover,
            quality = quality.label(),
            win_loss,
            "Move classified"
        );

        let tally = self.tally_mut(mover);
        if let Some(loss) = cp_loss {
            tally.cp_losses.push(loss);
        }
        tally.quality.record(quality);
        tally.win_losses.push(win_loss);

        if quality == MoveQuality::Blunder {
            let severity = blunder_severity(&scored.before, &scored.after, mover, win_loss);
            debug!(
                move_number,
                player = %mover,
                notation = %scored.notation,
                win_loss,
                severity,
                "Blunder"
            );
            self.biggest_blunder.offer(
                BlunderEvent {
                    move_number,
                    player: mover,
                    cp_loss: cp_loss.unwrap_or(0),
                    win_loss,
                    severity,
                    notation: scored.notation,
                    eval_before: cp_before,
                    eval_after: cp_after,
                },
                |b| b.severity,
            );
        }

        self.check_lucky_escape(cp_after, move_number);
        self.previous_cp = Some(cp_after);

        let extreme = EvalExtreme {
            cp: cp_after,
            evaluation: scored.after,
            move_number,
        };
        self.lowest.offer(extreme.clone(), |e| e.cp);
        self.highest.offer(extreme, |e| e.cp);
    }

    /// The opponent of `side` was clearly better after the previous sampled
    /// ply, and now the position is back near equality or in `side`'s favor.
    fn check_lucky_escape(&mut self, cp_after: i32, move_number: usize) {
        let Some(prev) = self.previous_cp else {
            return;
        };

        for side in Side::both() {
            let prev_for_side = side.sign() * prev;
            let now_for_side = side.sign() * cp_after;
            if prev_for_side < -ESCAPE_ADVANTAGE_CP && now_for_side > -ESCAPE_NEUTRAL_CP {
                self.lucky_escape.offer(
                    LuckyEscapeEvent {
                        player: side,
                        escape_amount: prev.abs() - cp_after.abs(),
                        eval_before: prev,
                        eval_after: cp_after,
                        move_number,
                    },
                    |e| e.escape_amount,
                );
            }
        }
    }

    /// Lowest evaluation seen from `side`'s point of view.
    fn worst_for(&self, side: Side) -> Option<&EvalExtreme> {
        match side {
            Side::White => self.lowest.get(),
            Side::Black => self.highest.get(),
        }
    }

    /// Whether `winner` was clearly losing at some sampled point. Only then
    /// does finishing need the final position's evaluation.
    pub fn is_comeback_candidate(&self, winner: Side) -> bool {
        self.worst_for(winner)
            .is_some_and(|worst| winner.sign() * worst.cp < -LOSING_THRESHOLD_CP)
    }

    fn comeback(&self, winner: Side, final_evaluation: &Evaluation) -> Option<ComebackEvent> {
        if !self.is_comeback_candidate(winner) {
            return None;
        }
        let worst = self.worst_for(winner)?;
        let final_cp = final_evaluation.to_centipawns();
        let swing = (final_cp - worst.cp).abs().min(MAX_COMEBACK_SWING_CP);

        Some(ComebackEvent {
            player: winner,
            swing,
            eval_from: worst.evaluation.display(),
            eval_to: final_evaluation.display(),
            eval_from_cp: worst.cp,
            eval_to_cp: final_cp,
            move_number: worst.move_number,
        })
    }

    /// Close the game. `final_evaluation` is the evaluation of the final
    /// position; it is only consulted for comeback detection.
    pub fn finish(self, context: GameContext, final_evaluation: Option<Evaluation>) -> GameReport {
        let biggest_comeback = match (context.winner, final_evaluation.as_ref()) {
            (Some(winner), Some(final_eval)) => self.comeback(winner, final_eval),
            _ => None,
        };

        GameReport {
            game_index: context.game_index,
            game_id: context.game_id,
            white: context.white,
            black: context.black,
            white_rating: context.white_rating,
            black_rating: context.black_rating,
            white_acpl: round1(calculate_acpl(&self.white.cp_losses)),
            black_acpl: round1(calculate_acpl(&self.black.cp_losses)),
            white_accuracy: round1(calculate_accuracy(&self.white.win_losses)),
            black_accuracy: round1(calculate_accuracy(&self.black.win_losses)),
            white_move_quality: self.white.quality,
            black_move_quality: self.black.quality,
            white_engine_moves: self.white.quality.excellent,
            black_engine_moves: self.black.quality.excellent,
            biggest_blunder: self.biggest_blunder.into_inner(),
            biggest_comeback,
            lucky_escape: self.lucky_escape.into_inner(),
            move_times: self.moves,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cp(value: i32) -> Evaluation {
        Evaluation::Centipawns(value)
    }

    fn context(winner: Option<Side>) -> GameContext {
        GameContext {
            game_index: 0,
            game_id: Some("g1".into()),
            white: "W".into(),
            black: "B".into(),
            white_rating: Some(2700),
            black_rating: None,
            winner,
        }
    }

    /// Feed a chain of White-perspective evaluations: ply i goes from
    /// evals[i] to evals[i + 1].
    fn feed(acc: &mut GameAccumulator, evals: &[Evaluation]) {
        for (ply, pair) in evals.windows(2).enumerate() {
            acc.record(ScoredPly {
                ply,
                notation: format!("m{ply}"),
                before: pair[0],
                after: pair[1],
            });
        }
    }

    #[test]
    fn test_sampling() {
        let acc = GameAccumulator::new(2);
        let sampled: Vec<usize> = (0..10).filter(|p| acc.is_sampled(*p)).collect();
        assert_eq!(sampled, vec![0, 1, 4, 5, 8, 9]);

        let every = GameAccumulator::new(1);
        assert!((0..10).all(|p| every.is_sampled(p)));
    }

    #[test]
    fn test_quiet_game() {
        let mut acc = GameAccumulator::new(1);
        feed(&mut acc, &[cp(20), cp(25), cp(15), cp(20), cp(30)]);
        let report = acc.finish(context(None), None);

        assert_eq!(report.white_move_quality.excellent, 2);
        assert_eq!(report.black_move_quality.excellent, 2);
        assert_eq!(report.white_engine_moves, 2);
        assert!(report.biggest_blunder.is_none());
        assert!(report.lucky_escape.is_none());
        assert!(report.biggest_comeback.is_none());
        assert_eq!(report.move_times.len(), 4);
        assert_eq!(report.move_times[1].color, Side::Black);
        assert_eq!(report.move_times[1].move_number, 1);
        assert_eq!(report.move_times[2].ply, 3);
        assert_eq!(report.move_times[2].move_number, 2);
        // Only Black's last move (20 -> 30) gives anything away
        assert_eq!(report.white_acpl, 0.0);
        assert_eq!(report.black_acpl, 5.0);
    }

    #[test]
    fn test_acpl_cap_and_mate_exclusion() {
        let mut acc = GameAccumulator::new(1);
        acc.record(ScoredPly {
            ply: 0,
            notation: "Qxb7".into(),
            before: cp(0),
            after: cp(-400),
        });
        acc.record(ScoredPly {
            ply: 2,
            notation: "Kh1".into(),
            before: cp(-400),
            after: Evaluation::Mate { distance: 2, winner: Side::Black },
        });
        let report = acc.finish(context(None), None);
        assert_eq!(report.white_acpl, 150.0);
        assert_eq!(report.black_acpl, 0.0);
    }

    #[test]
    fn test_empty_game_defaults() {
        let report = GameAccumulator::new(1).finish(context(Some(Side::White)), Some(cp(0)));
        assert_eq!(report.white_accuracy, 100.0);
        assert_eq!(report.black_accuracy, 100.0);
        assert_eq!(report.white_acpl, 0.0);
        assert!(report.biggest_comeback.is_none());
        assert!(report.move_times.is_empty());
    }

    #[test]
    fn test_biggest_blunder_by_severity() {
        let mut acc = GameAccumulator::new(1);
        // White blunders from equal into -300
        acc.record(ScoredPly { ply: 0, notation: "a".into(), before: cp(0), after: cp(-300) });
        // Black then blunders from winning (-300) into mate for White
        acc.record(ScoredPly {
            ply: 1,
            notation: "b".into(),
            before: cp(-300),
            after: Evaluation::Mate { distance: 1, winner: Side::White },
        });
        let report = acc.finish(context(None), None);

        let blunder = report.biggest_blunder.expect("blunder recorded");
        assert_eq!(blunder.player, Side::Black);
        assert_eq!(blunder.notation, "b");
        assert_eq!(blunder.move_number, 1);
        assert_eq!(blunder.cp_loss, 0);
        assert_eq!(blunder.eval_before, -300);
        assert_eq!(blunder.eval_after, 9990);
        assert!(blunder.severity >= blunder.win_loss);
        assert_eq!(report.white_move_quality.blunders, 1);
        assert_eq!(report.black_move_quality.blunders, 1);
    }

    #[test]
    fn test_blunder_tie_keeps_first() {
        let mut acc = GameAccumulator::new(1);
        acc.record(ScoredPly { ply: 0, notation: "first".into(), before: cp(0), after: cp(-300) });
        acc.record(ScoredPly { ply: 1, notation: "reply".into(), before: cp(-300), after: cp(-300) });
        acc.record(ScoredPly { ply: 2, notation: "second".into(), before: cp(0), after: cp(-300) });
        let report = acc.finish(context(None), None);
        assert_eq!(report.biggest_blunder.unwrap().notation, "first");
    }

    #[test]
    fn test_lucky_escape() {
        let mut acc = GameAccumulator::new(1);
        // White blunders to -350, Black fails to punish and it is back to +20
        feed(&mut acc, &[cp(0), cp(-350), cp(20)]);
        let report = acc.finish(context(None), None);

        let escape = report.lucky_escape.expect("escape recorded");
        assert_eq!(escape.player, Side::White);
        assert_eq!(escape.escape_amount, 330);
        assert_eq!(escape.eval_before, -350);
        assert_eq!(escape.eval_after, 20);
        assert_eq!(escape.move_number, 1);
    }

    #[test]
    fn test_lucky_escape_for_black() {
        let mut acc = GameAccumulator::new(1);
        feed(&mut acc, &[cp(0), cp(10), cp(500), cp(-30)]);
        let escape = acc.finish(context(None), None).lucky_escape.unwrap();
        assert_eq!(escape.player, Side::Black);
        assert_eq!(escape.escape_amount, 470);
        assert_eq!(escape.move_number, 2);
    }

    #[test]
    fn test_no_escape_when_advantage_kept() {
        let mut acc = GameAccumulator::new(1);
        feed(&mut acc, &[cp(0), cp(-350), cp(-120)]);
        assert!(acc.finish(context(None), None).lucky_escape.is_none());
    }

    #[test]
    fn test_comeback_for_white() {
        let mut acc = GameAccumulator::new(1);
        feed(&mut acc, &[cp(0), cp(-100), cp(-350), cp(-200), cp(50), cp(120)]);
        assert!(acc.is_comeback_candidate(Side::White));
        assert!(!acc.is_comeback_candidate(Side::Black));

        let report = acc.finish(context(Some(Side::White)), Some(cp(120)));
        let comeback = report.biggest_comeback.expect("comeback recorded");
        assert_eq!(comeback.player, Side::White);
        assert_eq!(comeback.swing, 470);
        assert_eq!(comeback.eval_from_cp, -350);
        assert_eq!(comeback.eval_to_cp, 120);
        assert_eq!(comeback.eval_from, "-350");
        assert_eq!(comeback.eval_to, "120");
        // -350 was reached after ply 1 (Black's first move)
        assert_eq!(comeback.move_number, 1);
    }

    #[test]
    fn test_comeback_for_black_capped() {
        let mut acc = GameAccumulator::new(1);
        feed(&mut acc, &[cp(0), cp(900), cp(700)]);
        let final_eval = Evaluation::Mate { distance: 0, winner: Side::Black };
        let report = acc.finish(context(Some(Side::Black)), Some(final_eval));
        let comeback = report.biggest_comeback.unwrap();
        assert_eq!(comeback.player, Side::Black);
        assert_eq!(comeback.swing, 2000);
        assert_eq!(comeback.eval_from, "900");
        assert_eq!(comeback.eval_to_cp, -10_000);
    }

    #[test]
    fn test_no_comeback_without_losing_position() {
        let mut acc = GameAccumulator::new(1);
        feed(&mut acc, &[cp(0), cp(-200), cp(300)]);
        assert!(!acc.is_comeback_candidate(Side::White));
        let report = acc.finish(context(Some(Side::White)), Some(cp(300)));
        assert!(report.biggest_comeback.is_none());
    }

    #[test]
    fn test_no_comeback_for_draw() {
        let mut acc = GameAccumulator::new(1);
        feed(&mut acc, &[cp(0), cp(-800), cp(0)]);
        let report = acc.finish(context(None), Some(cp(0)));
        assert!(report.biggest_comeback.is_none());
    }

    #[test]
    fn test_win_losses_never_negative() {
        let mut acc = GameAccumulator::new(1);
        feed(&mut acc, &[cp(-500), cp(300), cp(-700), cp(900), cp(0)]);
        assert!(acc.white.win_losses.iter().all(|l| *l >= 0.0));
        assert!(acc.black.win_losses.iter().all(|l| *l >= 0.0));
    }
}
