//! Turn state machine governing whose move it is and whether input is
//! accepted.

use crate::board::Mark;
use tracing::{debug, instrument};

/// One of the two seats at the table.
///
/// The seat-to-mark binding is permanent: Player 1 is always X and
/// Player 2 is always O, within and across rounds of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    /// Player 1, mark X.
    One,
    /// Player 2, mark O.
    Two,
}

impl PlayerSlot {
    /// The mark this seat plays.
    pub fn mark(self) -> Mark {
        match self {
            PlayerSlot::One => Mark::X,
            PlayerSlot::Two => Mark::O,
        }
    }

    /// The seat playing the given mark.
    pub fn for_mark(mark: Mark) -> Self {
        match mark {
            Mark::X => PlayerSlot::One,
            Mark::O => PlayerSlot::Two,
        }
    }

    /// The other seat.
    pub fn other(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The given seat won.
    Win(PlayerSlot),
    /// Board filled with no winner.
    Draw,
}

/// Current phase of the session's turn cycle. Exactly one is active at
/// any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// No round active; the user is at setup.
    Idle,
    /// Waiting for a human to pick a cell.
    AwaitingHumanMove(PlayerSlot),
    /// The AI owns the next move; cell input is rejected while the
    /// thinking delay and the move fetch run.
    AwaitingAIMove(PlayerSlot),
    /// The round ended; board is frozen for review.
    RoundOver(Outcome),
}

/// State machine deciding whose turn it is and whether cell input is
/// accepted.
///
/// The controller also tracks whether a gateway request is in flight:
/// at most one request may be outstanding per round, and input is
/// rejected for its duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnController {
    state: TurnState,
    in_flight: bool,
}

impl TurnController {
    /// Creates a controller in the `Idle` state.
    pub fn new() -> Self {
        Self {
            state: TurnState::Idle,
            in_flight: false,
        }
    }

    /// Current turn state.
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Whether a gateway request is outstanding.
    pub fn request_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether cell input is currently accepted. True only while awaiting
    /// a human move with no request outstanding.
    pub fn accepts_input(&self) -> bool {
        matches!(self.state, TurnState::AwaitingHumanMove(_)) && !self.in_flight
    }

    /// Whether an AI move is due and no request is outstanding.
    pub fn ai_move_due(&self) -> bool {
        matches!(self.state, TurnState::AwaitingAIMove(_)) && !self.in_flight
    }

    /// Marks a gateway request as dispatched.
    ///
    /// The session must call [`Self::end_request`] once the request
    /// resolves, success or failure.
    pub fn begin_request(&mut self) {
        debug_assert!(!self.in_flight, "second request dispatched while one in flight");
        self.in_flight = true;
    }

    /// Marks the outstanding gateway request as resolved.
    pub fn end_request(&mut self) {
        self.in_flight = false;
    }

    /// Enters the first turn of a fresh round.
    ///
    /// The arbiter names the opening mark; `ai_pending` means the opening
    /// move belongs to the AI and must be fetched after the thinking
    /// delay.
    #[instrument(skip(self))]
    pub fn round_started(&mut self, first_to_move: Mark, ai_pending: bool) {
        let slot = PlayerSlot::for_mark(first_to_move);
        self.state = if ai_pending {
            TurnState::AwaitingAIMove(slot)
        } else {
            TurnState::AwaitingHumanMove(slot)
        };
        debug!(state = ?self.state, "Round started");
    }

    /// Advances past an applied move that did not end the round.
    ///
    /// `next_to_move` comes from the arbiter reply; `ai_pending` routes
    /// the next turn to the AI. Consecutive AI turns are permitted.
    #[instrument(skip(self))]
    pub fn move_resolved(&mut self, next_to_move: Mark, ai_pending: bool) {
        let slot = PlayerSlot::for_mark(next_to_move);
        self.state = if ai_pending {
            TurnState::AwaitingAIMove(slot)
        } else {
            TurnState::AwaitingHumanMove(slot)
        };
        debug!(state = ?self.state, "Turn advanced");
    }

    /// Freezes the round with its outcome.
    #[instrument(skip(self))]
    pub fn round_over(&mut self, outcome: Outcome) {
        self.state = TurnState::RoundOver(outcome);
        debug!(state = ?self.state, "Round over");
    }

    /// Full reset back to `Idle` (return to setup).
    pub fn reset(&mut self) {
        self.state = TurnState::Idle;
        self.in_flight = false;
    }
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new()
    }
}
