//! Render instructions handed to the presentation layer.
//!
//! The session core never touches a presentation surface. Instead every
//! operation produces a [`RenderInstruction`]: a plain description of the
//! desired UI state. A renderer draws it and forwards raw input events
//! back to the session.

use crate::board::{Board, Mark};
use crate::history::MoveRecord;
use crate::score::Scores;

/// The turn banner above the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnBanner {
    /// No round active; the user is at setup.
    Idle,
    /// A human is expected to pick a cell.
    HumanTurn {
        /// Display name of the player to move.
        name: String,
        /// Their mark.
        mark: Mark,
    },
    /// The AI owns the next move; shown during the thinking delay and
    /// the move fetch.
    AiThinking {
        /// Display name of the AI.
        name: String,
        /// Its mark.
        mark: Mark,
    },
    /// The round ended; the board stays visible for review.
    RoundOver {
        /// Result headline, e.g. `Zeus (O) wins!`.
        headline: String,
    },
}

impl TurnBanner {
    /// Banner text for presentation surfaces that only render a line.
    pub fn label(&self) -> String {
        match self {
            TurnBanner::Idle => "Choose a mode to start playing".to_string(),
            TurnBanner::HumanTurn { name, mark } => format!("{name}'s turn ({mark})"),
            TurnBanner::AiThinking { name, .. } => format!("{name} is calculating..."),
            TurnBanner::RoundOver { headline } => headline.clone(),
        }
    }
}

/// Content of the end-of-round result modal, produced when the user
/// acknowledges the round-over banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultModal {
    /// Modal title.
    pub title: String,
    /// Modal body text.
    pub message: String,
}

impl ResultModal {
    /// Modal for a won round.
    pub fn win(winner_name: &str, mark: Mark) -> Self {
        Self {
            title: "Victory!".to_string(),
            message: format!("{winner_name} ({mark}) wins the game!"),
        }
    }

    /// Modal for a drawn round.
    pub fn draw() -> Self {
        Self {
            title: "It's a draw!".to_string(),
            message: "Great game! Neither player won.".to_string(),
        }
    }
}

/// Complete description of the UI state after a session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInstruction {
    /// Board cell values.
    pub board: Board,
    /// Which cells accept a click: empty cells during the local human's
    /// turn, nothing otherwise.
    pub input_mask: [bool; 9],
    /// Turn banner state.
    pub banner: TurnBanner,
    /// Move history, oldest first.
    pub history: Vec<MoveRecord>,
    /// Pluralized move counter, e.g. `1 move` / `3 moves`.
    pub move_count_label: String,
    /// Running session scores.
    pub scores: Scores,
    /// Player 1's display name.
    pub player1_name: String,
    /// Player 2's display name.
    pub player2_name: String,
    /// Non-fatal notice to surface (gateway failures).
    pub notice: Option<String>,
    /// Result modal content, present only after the round-over banner
    /// was acknowledged.
    pub modal: Option<ResultModal>,
}

/// Pluralized move-count label.
pub fn move_count_label(count: usize) -> String {
    if count == 1 {
        "1 move".to_string()
    } else {
        format!("{count} moves")
    }
}
