//! Game source error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameSourceError {
    #[error("I/O error reading games: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
