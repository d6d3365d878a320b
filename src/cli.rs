//! Command-line interface for the console client.

use crate::config::{AiOpponent, GameMode};
use clap::Parser;

/// Tic-tac-toe console client for a remote arbiter service
#[derive(Parser, Debug)]
#[command(name = "tictactoe_client")]
#[command(about = "Play tic-tac-toe against a remote arbiter", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the arbiter service
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    pub server_url: String,

    /// Game mode
    #[arg(long, value_enum, default_value_t = GameMode::Pva)]
    pub mode: GameMode,

    /// Player 1's name (defaults if blank)
    #[arg(long, default_value = "")]
    pub player1: String,

    /// Player 2's name (PvP mode only)
    #[arg(long)]
    pub player2: Option<String>,

    /// AI opponent (PvAI mode only)
    #[arg(long, value_enum, default_value_t = AiOpponent::Zeus)]
    pub ai: AiOpponent,

    /// Seconds the AI "thinks" before its move is fetched
    #[arg(long, default_value_t = 2)]
    pub ai_delay_secs: u64,
}
