//! Blunder severity: a ranking score that puts blunders from very different
//! games on one scale. A blunder into a quick mate, or one that throws away a
//! large advantage, outranks a plain win% drop of the same size.

use crate::evaluation::{Evaluation, Side};
use crate::thresholds::{
    LOST_MATE_MULTIPLIER, MARGIN_SCALE_CP, MATE_PENALTY, MAX_EXTRA_MARGIN_MULTIPLIER,
    WINNING_MARGIN_CP,
};

/// Severity of a blunder by `mover`. Always `>= win_loss`; only meaningful
/// relative to other severities.
pub fn blunder_severity(before: &Evaluation, after: &Evaluation, mover: Side, win_loss: f64) -> f64 {
    let mut severity = win_loss;

    if let Evaluation::Mate { distance, .. } = *after {
        severity += MATE_PENALTY / (f64::from(distance) + 1.0);
    }

    match *before {
        Evaluation::Centipawns(cp) => {
            let margin = cp.abs();
            if margin > WINNING_MARGIN_CP {
                let extra = f64::from(margin - WINNING_MARGIN_CP) / MARGIN_SCALE_CP;
                severity *= 1.0 + extra.min(MAX_EXTRA_MARGIN_MULTIPLIER);
            }
        }
        Evaluation::Mate { winner, .. } if winner == mover => {
            severity *= LOST_MATE_MULTIPLIER;
        }
        Evaluation::Mate { .. } => {}
    }

    severity
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mate(distance: u32, winner: Side) -> Evaluation {
        Evaluation::Mate { distance, winner }
    }

    #[test]
    fn test_base_severity_is_win_loss() {
        let s = blunder_severity(
            &Evaluation::Centipawns(50),
            &Evaluation::Centipawns(-250),
            Side::White,
            30.0,
        );
        assert_eq!(s, 30.0);
    }

    #[test]
    fn test_mate_after_penalty() {
        let before = Evaluation::Centipawns(0);
        let m1 = blunder_severity(&before, &mate(1, Side::Black), Side::White, 30.0);
        let m2 = blunder_severity(&before, &mate(2, Side::Black), Side::White, 30.0);
        let m5 = blunder_severity(&before, &mate(5, Side::Black), Side::White, 30.0);
        let cp = blunder_severity(&before, &Evaluation::Centipawns(-900), Side::White, 30.0);

        assert_eq!(m1, 80.0);
        assert!((m2 - (30.0 + 100.0 / 3.0)).abs() < 1e-9);
        assert!(m1 > m5);
        assert!(m5 > cp);
    }

    #[test]
    fn test_winning_margin_multiplier() {
        let after = Evaluation::Centipawns(0);
        let at_400 = blunder_severity(&Evaluation::Centipawns(400), &after, Side::White, 20.0);
        assert!((at_400 - 30.0).abs() < 1e-9);

        let capped = blunder_severity(&Evaluation::Centipawns(1500), &after, Side::White, 20.0);
        assert!((capped - 60.0).abs() < 1e-9);

        // Only strictly above 200 counts
        let at_200 = blunder_severity(&Evaluation::Centipawns(200), &after, Side::White, 20.0);
        assert_eq!(at_200, 20.0);

        // Magnitude, not sign
        let black = blunder_severity(&Evaluation::Centipawns(-600), &after, Side::Black, 20.0);
        assert!((black - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_lost_forced_mate_triples() {
        let after = Evaluation::Centipawns(0);
        let own = blunder_severity(&mate(3, Side::Black), &after, Side::Black, 25.0);
        assert_eq!(own, 75.0);

        let theirs = blunder_severity(&mate(3, Side::White), &after, Side::Black, 25.0);
        assert_eq!(theirs, 25.0);
    }

    #[test]
    fn test_adjustments_compose() {
        // Mate penalty then margin multiplier
        let s = blunder_severity(&Evaluation::Centipawns(600), &mate(1, Side::Black), Side::White, 40.0);
        assert!((s - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_never_below_win_loss() {
        for before in [Evaluation::Centipawns(-800), mate(4, Side::White), Evaluation::Centipawns(30)] {
            for after in [Evaluation::Centipawns(-100), mate(9, Side::Black)] {
                let s = blunder_severity(&before, &after, Side::Black, 22.5);
                assert!(s >= 22.5);
            }
        }
    }
}
