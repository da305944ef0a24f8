//! Game-quality analyzer
//!
//! Reads PGN (or the JSON game list) from stdin, scores every game with a
//! local Stockfish and prints the per-game reports plus awards as JSON.

use std::io::Read;

use clap::Parser;
use tracing::info;

use chess_core::json_input::parse_json_games;
use chess_core::pgn::parse_pgn;
use game_quality::analyzer::analyze_games;
use game_quality::config::AnalysisConfig;
use game_quality::stockfish::StockfishEngine;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct CommandArgs {
    /// Search depth per position
    #[arg(long)]
    depth: Option<u32>,

    /// Score every Nth move of each color
    #[arg(long)]
    sample: Option<u32>,

    /// Path to the Stockfish binary
    #[arg(long)]
    stockfish_path: Option<String>,

    /// Input is a JSON game list rather than PGN
    #[arg(long)]
    json_input: bool,
}

impl CommandArgs {
    fn apply(self, config: &mut AnalysisConfig) {
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(sample) = self.sample {
            config.sample_rate = sample;
        }
        if let Some(path) = self.stockfish_path {
            config.stockfish_path = path;
        }
        config.json_input |= self.json_input;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the JSON document
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let args = CommandArgs::parse();
    let mut config = AnalysisConfig::from_env();
    args.apply(&mut config);
    config.validate()?;

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    let games = if config.json_input {
        parse_json_games(&input)?
    } else {
        parse_pgn(&input)?
    };
    info!(
        games = games.len(),
        depth = config.depth,
        sample_rate = config.sample_rate,
        "Games loaded"
    );

    let mut engine = StockfishEngine::new(&config.stockfish_path, config.depth).await?;
    info!(stockfish_path = %config.stockfish_path, "Stockfish engine ready");

    let result = analyze_games(&mut engine, &games, config.sample_rate).await;
    engine.quit().await;
    let output = result?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
