//! Game session orchestration.
//!
//! [`GameSession`] binds the session config, turn controller, history log,
//! score tracker and move gateway. UI events come in as method calls; every
//! call returns a [`RenderInstruction`] describing the state to draw. All
//! mutable state lives in this one value, so `&mut self` is the only
//! synchronization the single-threaded event flow needs.

use crate::board::{Board, Cell};
use crate::config::SessionConfig;
use crate::gateway::{GatewayError, MoveGateway, MoveReply};
use crate::history::HistoryLog;
use crate::position::Position;
use crate::render::{RenderInstruction, ResultModal, TurnBanner, move_count_label};
use crate::score::{ScoreTracker, Scores};
use crate::turn::{Outcome, PlayerSlot, TurnController, TurnState};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Thinking affordance shown before an AI move is fetched.
pub const AI_THINKING_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
struct RoundResult {
    outcome: Outcome,
    winner_name: Option<String>,
}

/// Orchestrator for one game session: a sequence of rounds sharing
/// persistent scores and player identities.
///
/// The session never applies a move optimistically; the board, history and
/// scores are only ever replaced from a successful arbiter snapshot, and a
/// failed request leaves every component in its pre-request state.
pub struct GameSession {
    config: SessionConfig,
    gateway: Box<dyn MoveGateway>,
    controller: TurnController,
    history: HistoryLog,
    tracker: ScoreTracker,
    board: Board,
    player1_name: String,
    player2_name: String,
    ai_delay: Duration,
    notice: Option<String>,
    last_result: Option<RoundResult>,
}

impl GameSession {
    /// Creates a session for the given config and gateway.
    pub fn new(config: SessionConfig, gateway: Box<dyn MoveGateway>) -> Self {
        let player1_name = config.player1_name.clone();
        let player2_name = config.provisional_player2_name();
        Self {
            config,
            gateway,
            controller: TurnController::new(),
            history: HistoryLog::new(),
            tracker: ScoreTracker::new(),
            board: Board::new(),
            player1_name,
            player2_name,
            ai_delay: AI_THINKING_DELAY,
            notice: None,
            last_result: None,
        }
    }

    /// Overrides the AI thinking delay. Tests inject [`Duration::ZERO`]
    /// to run the two-phase AI protocol deterministically.
    pub fn with_ai_delay(mut self, delay: Duration) -> Self {
        self.ai_delay = delay;
        self
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The turn controller.
    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The current round's move history.
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// The running session scores.
    pub fn scores(&self) -> Scores {
        self.tracker.scores()
    }

    /// Whether an AI move is due and should be resolved via
    /// [`Self::resolve_pending_ai`].
    pub fn ai_move_pending(&self) -> bool {
        self.controller.ai_move_due()
    }

    /// Starts a fresh round. `reset_scores` distinguishes a brand-new
    /// session (from setup) from play-again, which keeps the counters.
    #[instrument(skip(self))]
    pub async fn start_new_round(&mut self, reset_scores: bool) -> RenderInstruction {
        self.notice = None;
        if self.controller.request_in_flight() {
            debug!("Round start ignored while a request is in flight");
            return self.render();
        }
        info!(reset_scores, "Starting new round");
        self.controller.begin_request();
        let result = self.gateway.start_round(&self.config, reset_scores).await;
        self.controller.end_request();
        match result {
            Ok(start) => {
                self.board = start.board;
                self.history.clear();
                self.tracker.sync(start.scores);
                self.player1_name = start.player1_name;
                self.player2_name = start.player2_name;
                self.last_result = None;
                self.controller.round_started(start.first_to_move, start.ai_pending);
            }
            Err(e) => {
                warn!(error = %e, "Round start failed");
                self.notice = Some(format!("Could not start round: {e}"));
            }
        }
        self.render()
    }

    /// Handles a cell click. A no-op (state unchanged, no gateway call)
    /// unless a human move is awaited with no request outstanding.
    #[instrument(skip(self), fields(position = %position))]
    pub async fn player_move(&mut self, position: Position) -> RenderInstruction {
        self.notice = None;
        if !self.controller.accepts_input() {
            debug!(state = ?self.controller.state(), "Cell input rejected");
            return self.render();
        }
        self.controller.begin_request();
        let result = self.gateway.submit_move(position).await;
        self.controller.end_request();
        match result {
            Ok(reply) => self.apply_move_reply(reply),
            Err(GatewayError::IllegalMove(msg)) => {
                // The controller never submits outside AwaitingHumanMove,
                // so a legality rejection means client and arbiter
                // disagree about the round.
                error!(error = %msg, "Arbiter rejected a move the controller allowed");
                self.notice = Some(format!("Move rejected: {msg}"));
            }
            Err(e) => {
                warn!(error = %e, "Move request failed");
                self.notice = Some(format!("Move failed: {e}"));
            }
        }
        self.render()
    }

    /// Waits out the thinking delay, then fetches and applies the AI's
    /// move.
    ///
    /// `AwaitingAIMove` was already entered when the previous reply
    /// announced the AI's turn; keeping the delay and the fetch in this
    /// separate step is what lets tests drive the protocol with a zero
    /// delay. On failure the controller stays in `AwaitingAIMove`, so the
    /// caller may retry.
    #[instrument(skip(self))]
    pub async fn resolve_pending_ai(&mut self) -> RenderInstruction {
        self.notice = None;
        if !self.controller.ai_move_due() {
            debug!(state = ?self.controller.state(), "No AI move due");
            return self.render();
        }
        sleep(self.ai_delay).await;
        self.controller.begin_request();
        let result = self.gateway.request_ai_move().await;
        self.controller.end_request();
        match result {
            Ok(reply) => self.apply_move_reply(reply),
            Err(e) => {
                warn!(error = %e, "AI move request failed");
                self.notice = Some(format!("AI move failed: {e}"));
            }
        }
        self.render()
    }

    /// Acknowledges the round-over banner, producing the result modal.
    #[instrument(skip(self))]
    pub fn continue_after_round_over(&mut self) -> RenderInstruction {
        let mut frame = self.render();
        if let TurnState::RoundOver(outcome) = self.controller.state() {
            frame.modal = Some(match outcome {
                Outcome::Draw => ResultModal::draw(),
                Outcome::Win(slot) => {
                    ResultModal::win(self.winner_display_name(slot), slot.mark())
                }
            });
        }
        frame
    }

    /// Abandons the session: scores zeroed, controller idle, board and
    /// history cleared. The setup flow builds a new config from here.
    #[instrument(skip(self))]
    pub fn return_to_setup(&mut self) -> RenderInstruction {
        info!("Returning to setup");
        self.controller.reset();
        self.tracker.reset();
        self.history.clear();
        self.board = Board::new();
        self.player1_name = self.config.player1_name.clone();
        self.player2_name = self.config.provisional_player2_name();
        self.notice = None;
        self.last_result = None;
        self.render()
    }

    fn apply_move_reply(&mut self, reply: MoveReply) {
        let mut history = HistoryLog::new();
        if let Err(e) = history.replace_from(reply.history) {
            error!(error = %e, "Arbiter history snapshot is inconsistent");
            self.notice = Some(format!("Malformed reply from arbiter: {e}"));
            return;
        }
        self.board = reply.board;
        self.history = history;
        debug_assert_eq!(self.history.count(), self.board.occupied_count());

        if reply.game_over {
            let outcome = match reply.winner {
                Some(mark) => Outcome::Win(PlayerSlot::for_mark(mark)),
                None => Outcome::Draw,
            };
            match reply.scores {
                Some(scores) => self.tracker.sync(scores),
                None => warn!("Round ended without a score snapshot"),
            }
            self.last_result = Some(RoundResult {
                outcome,
                winner_name: reply.winner_name,
            });
            self.controller.round_over(outcome);
            info!(?outcome, "Round over");
        } else if let Some(next) = reply.next_to_move {
            self.controller.move_resolved(next, reply.ai_pending);
        }
    }

    fn name_of(&self, slot: PlayerSlot) -> &str {
        match slot {
            PlayerSlot::One => &self.player1_name,
            PlayerSlot::Two => &self.player2_name,
        }
    }

    // Prefer the arbiter-reported winner name; the local name is the
    // fallback for replies that omit it.
    fn winner_display_name(&self, slot: PlayerSlot) -> &str {
        self.last_result
            .as_ref()
            .and_then(|r| r.winner_name.as_deref())
            .unwrap_or_else(|| self.name_of(slot))
    }

    fn banner(&self) -> TurnBanner {
        match self.controller.state() {
            TurnState::Idle => TurnBanner::Idle,
            TurnState::AwaitingHumanMove(slot) => TurnBanner::HumanTurn {
                name: self.name_of(slot).to_string(),
                mark: slot.mark(),
            },
            TurnState::AwaitingAIMove(slot) => TurnBanner::AiThinking {
                name: self.name_of(slot).to_string(),
                mark: slot.mark(),
            },
            TurnState::RoundOver(outcome) => TurnBanner::RoundOver {
                headline: match outcome {
                    Outcome::Draw => "It's a draw!".to_string(),
                    Outcome::Win(slot) => format!(
                        "{} ({}) wins!",
                        self.winner_display_name(slot),
                        slot.mark()
                    ),
                },
            },
        }
    }

    fn input_mask(&self) -> [bool; 9] {
        let mut mask = [false; 9];
        if self.controller.accepts_input() {
            for (index, cell) in self.board.cells().iter().enumerate() {
                mask[index] = *cell == Cell::Empty;
            }
        }
        mask
    }

    fn render(&self) -> RenderInstruction {
        RenderInstruction {
            board: self.board.clone(),
            input_mask: self.input_mask(),
            banner: self.banner(),
            history: self.history.records().to_vec(),
            move_count_label: move_count_label(self.history.count()),
            scores: self.tracker.scores(),
            player1_name: self.player1_name.clone(),
            player2_name: self.player2_name.clone(),
            notice: self.notice.clone(),
            modal: None,
        }
    }
}
