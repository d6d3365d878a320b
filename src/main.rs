//! Console client for a remote tic-tac-toe arbiter.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tictactoe_client::{Cli, GameMode, GameSession, HttpGateway, SessionConfig, console};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!(server_url = %cli.server_url, mode = ?cli.mode, "Starting console client");

    let config = match cli.mode {
        GameMode::Pvp => {
            SessionConfig::pvp(&cli.player1, cli.player2.as_deref().unwrap_or_default())
        }
        GameMode::Pva => SessionConfig::pva(&cli.player1, cli.ai),
    };

    let gateway = HttpGateway::new(cli.server_url)?;
    let session = GameSession::new(config, Box::new(gateway))
        .with_ai_delay(Duration::from_secs(cli.ai_delay_secs));

    console::run(session).await
}
