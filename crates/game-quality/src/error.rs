//! Analysis error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("Failed to initialize evaluator: {0}")]
    EvaluatorInit(String),

    #[error("Stockfish error: {0}")]
    Stockfish(String),

    #[error("Invalid evaluation kind: {0}")]
    InvalidEvaluationKind(String),

    #[error("Illegal move {san} at ply {ply}")]
    IllegalMove { ply: usize, san: String },

    #[error("Game source error: {0}")]
    GameSource(#[from] chess_core::GameSourceError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
