//! Session controller for a remote tic-tac-toe arbiter.
//!
//! The remote arbiter is the sole rules authority: it validates moves,
//! detects wins and draws, and selects AI moves. This crate is the client
//! side of that split - a game session state machine that sequences human
//! and AI turns, keeps move history and running scores, and describes the
//! UI to draw after every event.
//!
//! # Architecture
//!
//! - **Gateway**: [`MoveGateway`] abstracts the arbiter; [`HttpGateway`]
//!   speaks its JSON protocol over HTTP.
//! - **Turn controller**: [`TurnController`] decides whose turn it is and
//!   whether cell input is accepted.
//! - **Session**: [`GameSession`] orchestrates rounds and emits a
//!   [`RenderInstruction`] after every event.
//! - **Console**: a thin presentation layer that draws instructions and
//!   forwards raw input.
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_client::{AiOpponent, GameSession, HttpGateway, SessionConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = SessionConfig::pva("Ada", AiOpponent::Zeus);
//! let gateway = HttpGateway::new("http://127.0.0.1:5000")?;
//! let mut session = GameSession::new(config, Box::new(gateway));
//!
//! let frame = session.start_new_round(true).await;
//! println!("{}", frame.banner.label());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod cli;
mod config;
mod gateway;
mod history;
mod position;
mod render;
mod score;
mod session;
mod turn;

/// Console presentation layer.
pub mod console;

// Crate-level exports - board and positions
pub use board::{Board, BoardDecodeError, Cell, Mark};

// Crate-level exports - CLI
pub use cli::Cli;

// Crate-level exports - configuration
pub use config::{AiOpponent, GameMode, SessionConfig};

// Crate-level exports - gateway contract
pub use gateway::{GatewayError, HttpGateway, MoveGateway, MoveReply, RoundStart};

// Crate-level exports - history and scores
pub use history::{HistoryError, HistoryLog, MoveRecord};
pub use position::Position;
pub use score::{ScoreTracker, Scores};

// Crate-level exports - session core
pub use render::{RenderInstruction, ResultModal, TurnBanner};
pub use session::{AI_THINKING_DELAY, GameSession};
pub use turn::{Outcome, PlayerSlot, TurnController, TurnState};
