//! Analysis configuration from environment variables

use std::env;

use crate::error::AnalysisError;
use crate::stockfish::find_stockfish_path;

const DEFAULT_DEPTH: u32 = 15;
const DEFAULT_SAMPLE_RATE: u32 = 1;

#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Path to Stockfish binary
    pub stockfish_path: String,

    /// Search depth per position
    pub depth: u32,

    /// Score every Nth move of each color
    pub sample_rate: u32,

    /// Read `{"games": [...]}` JSON instead of raw PGN
    pub json_input: bool,
}

impl AnalysisConfig {
    /// Load configuration from environment variables.
    /// Unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let stockfish_path = lookup("STOCKFISH_PATH").unwrap_or_else(find_stockfish_path);

        let depth = lookup("ANALYSIS_DEPTH")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DEPTH);

        let sample_rate = lookup("SAMPLE_RATE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SAMPLE_RATE);

        Self {
            stockfish_path,
            depth,
            sample_rate,
            json_input: false,
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.depth == 0 {
            return Err(AnalysisError::Config("depth must be at least 1"));
        }
        if self.sample_rate == 0 {
            return Err(AnalysisError::Config("sample rate must be at least 1"));
        }
        if self.stockfish_path.trim().is_empty() {
            return Err(AnalysisError::Config("Stockfish path is empty"));
        }
        Ok(())
    }
}
