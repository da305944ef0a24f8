//! Stockfish engine wrapper using UCI protocol (async I/O)

use std::path::{Path, PathBuf};
use std::process::Stdio;

use shakmaty::fen::Fen;
use shakmaty::{Chess, EnPassantMode, Position};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use crate::error::AnalysisError;
use crate::evaluation::{Evaluation, Side};
use crate::evaluator::PositionEvaluator;

/// Install locations checked when `stockfish` is not on `PATH`.
const COMMON_STOCKFISH_PATHS: &[&str] = &[
    "/opt/homebrew/bin/stockfish", // macOS Homebrew (Apple Silicon)
    "/usr/local/bin/stockfish",    // macOS Homebrew (Intel)
    "/usr/bin/stockfish",          // Linux apt
    "/usr/games/stockfish",        // Linux apt alternative location
];

/// Locate a Stockfish binary: `PATH` first, then common install locations,
/// finally the bare name so spawning reports a useful error.
pub fn find_stockfish_path() -> String {
    let on_path = std::env::var_os("PATH").and_then(|paths| {
        std::env::split_paths(&paths)
            .map(|dir| dir.join("stockfish"))
            .find(|candidate| candidate.is_file())
    });

    on_path
        .or_else(|| {
            COMMON_STOCKFISH_PATHS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.is_file())
        })
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stockfish".to_string())
}

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    depth: u32,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI. Any failure here is
    /// an [`AnalysisError::EvaluatorInit`].
    pub async fn new(path: impl AsRef<Path>, depth: u32) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AnalysisError::EvaluatorInit(format!(
                    "Failed to spawn Stockfish at {}: {e}",
                    path.display()
                ))
            })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| AnalysisError::EvaluatorInit("Stockfish stdin unavailable".into()))?;
        let stdout = process
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| AnalysisError::EvaluatorInit("Stockfish stdout unavailable".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout,
            depth,
        };

        engine.handshake().await.map_err(|e| match e {
            AnalysisError::Stockfish(msg) => AnalysisError::EvaluatorInit(msg),
            other => other,
        })?;

        Ok(engine)
    }

    async fn handshake(&mut self) -> Result<(), AnalysisError> {
        self.send("uci").await?;
        self.wait_for("uciok").await?;

        // Configure for analysis
        self.send("setoption name Threads value 1").await?;
        self.send("setoption name Hash value 256").await?;
        self.send("setoption name UCI_AnalyseMode value true").await?;
        self.send("isready").await?;
        self.wait_for("readyok").await
    }

    /// Send a command to Stockfish
    async fn send(&mut self, cmd: &str) -> Result<(), AnalysisError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| AnalysisError::Stockfish(format!("Failed to write to Stockfish: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| AnalysisError::Stockfish(format!("Failed to flush stdin: {e}")))?;
        Ok(())
    }

    /// Read one trimmed line; EOF means the engine died.
    async fn read_line(&mut self, line: &mut String) -> Result<(), AnalysisError> {
        line.clear();
        let read = self
            .stdout
            .read_line(line)
            .await
            .map_err(|e| AnalysisError::Stockfish(format!("Failed to read from Stockfish: {e}")))?;
        if read == 0 {
            return Err(AnalysisError::Stockfish("Stockfish closed its output".into()));
        }
        debug!(line = line.trim(), "SF >");
        Ok(())
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), AnalysisError> {
        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            if line.trim() == expected {
                return Ok(());
            }
        }
    }

    /// Search `fen` to the configured depth and return the last reported
    /// score, relative to the side to move.
    async fn search(&mut self, fen: &str) -> Result<(String, i32), AnalysisError> {
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go depth {}", self.depth)).await?;

        let mut score = None;
        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            let trimmed = line.trim();

            if trimmed.starts_with("info") {
                if let Some(parsed) = parse_score(trimmed) {
                    score = Some(parsed);
                }
            } else if trimmed.starts_with("bestmove") {
                break;
            }
        }

        score.ok_or_else(|| AnalysisError::Stockfish(format!("No score reported for {fen}")))
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl PositionEvaluator for StockfishEngine {
    async fn evaluate(&mut self, position: &Chess) -> Result<Evaluation, AnalysisError> {
        let fen = Fen::from_position(position, EnPassantMode::Legal).to_string();
        let (kind, value) = self.search(&fen).await?;
        to_white_perspective(&kind, value, position.turn().into())
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

/// Parse `score <kind> <value>` from an info line. The kind is returned
/// verbatim so unknown kinds can be rejected by the caller.
fn parse_score(line: &str) -> Option<(String, i32)> {
    let mut parts = line.split_whitespace();
    parts.by_ref().find(|part| *part == "score")?;
    let kind = parts.next()?;
    let value = parts.next()?.parse().ok()?;
    Some((kind.to_string(), value))
}

/// Convert a side-to-move relative UCI score into a White-perspective
/// [`Evaluation`]. `mate 0` means the side to move is already mated.
fn to_white_perspective(kind: &str, value: i32, to_move: Side) -> Result<Evaluation, AnalysisError> {
    match kind {
        "mate" if value == 0 => Ok(Evaluation::Mate {
            distance: 0,
            winner: to_move.opponent(),
        }),
        _ => Evaluation::from_raw(kind, to_move.sign() * value),
    }
}
