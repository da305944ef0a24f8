//! Game-quality metrics for chess games: accuracy, ACPL, move-quality
//! histograms, blunders, comebacks and lucky escapes, plus cross-game awards.

pub mod accumulator;
pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod evaluator;
pub mod leaderboard;
pub mod ranking;
pub mod report;
pub mod severity;
pub mod stockfish;
pub mod thresholds;
pub mod win_probability;

pub use analyzer::{analyze_game, analyze_games};
pub use error::AnalysisError;
pub use evaluation::{Evaluation, Side};
pub use evaluator::PositionEvaluator;
pub use leaderboard::{AnalysisOutput, Summary};
pub use report::GameReport;
