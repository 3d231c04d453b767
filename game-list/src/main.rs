//! game-list: render a synchronized game snapshot as display lists
//!
//! Reads a snapshot of server rows (a JSON array), runs it through the
//! game list service and prints the games grouped as your turn, opponent's
//! turn and finished.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;

use game_status::{
    record_to_json, GameBlocks, GameListConfig, GameListService, GameRecord, GameView,
    ServiceError, StaticGameSource,
};

const DEFAULT_LOG_FILTER: &str = "game_list=info,game_status=info";

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "game-list")]
#[command(about = "Show synchronized chess games grouped by whose turn it is")]
struct Cli {
    /// Path to a JSON snapshot of server rows
    #[arg(short, long, env = "GAME_LIST_SNAPSHOT")]
    snapshot: String,

    /// Path to configuration file (.yaml/.yml or .toml)
    #[arg(short, long, default_value = "game-list.toml")]
    config: String,

    /// Which games to show (overrides config file)
    #[arg(long)]
    view: Option<GameView>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the lists
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    let view = cli.view.unwrap_or(config.default_view);
    info!(view = %view, snapshot = %cli.snapshot, "Loading games");

    let content = std::fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("reading snapshot {}", cli.snapshot))?;
    let rows: serde_json::Value =
        serde_json::from_str(&content).context("snapshot is not valid JSON")?;

    let source = match StaticGameSource::from_json(&rows) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Unable to display games: {}", e);
            std::process::exit(1);
        }
    };

    let service = GameListService::new(Arc::new(source)).with_config(config);
    let result = match service.start().await {
        Ok(()) => service.blocks(view).await,
        Err(e) => Err(e),
    };
    service.shutdown().await;

    match result {
        Ok(blocks) => {
            print_blocks(&blocks, cli.format)?;
            Ok(())
        }
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    }
}

/// `RUST_LOG` when set and valid, otherwise info for this tool and the
/// game-status library.
fn log_filter(rust_log: Option<&str>) -> tracing_subscriber::EnvFilter {
    rust_log
        .and_then(|spec| tracing_subscriber::EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Load config from file, falling back to defaults when it does not exist.
fn load_config(path: &str) -> anyhow::Result<GameListConfig> {
    let path = Path::new(path);
    if !path.exists() {
        info!("Config file not found, using defaults");
        return Ok(GameListConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => GameListConfig::from_yaml(&content)?,
        _ => GameListConfig::from_toml(&content)?,
    };
    Ok(config)
}

fn print_blocks(blocks: &GameBlocks<GameRecord>, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for (block, games) in blocks.iter() {
                println!("{} ({})", block.title(), games.len());
                for game in games {
                    println!("  {}", game.game_id()?);
                }
            }
        }
        OutputFormat::Json => {
            let mut out = serde_json::Map::new();
            for (block, games) in blocks.iter() {
                let rows: Vec<_> = games.iter().map(record_to_json).collect();
                out.insert(block.as_str().to_string(), rows.into());
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn report(error: &ServiceError) {
    tracing::error!(error = %error, "Failed to build game lists");
    eprintln!("{}", error.user_message());
}
