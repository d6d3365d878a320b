//! Wire contract with the remote move-resolution arbiter.
//!
//! The arbiter is the sole rules authority: it validates moves, detects
//! terminal positions, and selects AI moves. Every mutating call returns a
//! complete snapshot (full board, full history, full scores), so the client
//! never reconstructs state incrementally and cannot drift from the
//! arbiter's bookkeeping.

use crate::board::{Board, Mark};
use crate::config::SessionConfig;
use crate::history::MoveRecord;
use crate::position::Position;
use crate::score::Scores;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Errors surfaced by gateway operations.
///
/// On any error the caller must assume no round state changed.
#[derive(Debug, derive_more::Display)]
pub enum GatewayError {
    /// Network or transport failure.
    #[display("transport failure: {_0}")]
    Transport(reqwest::Error),
    /// The arbiter replied `success: false`.
    #[display("arbiter rejected request: {_0}")]
    Rejected(String),
    /// The arbiter rejected a move as illegal. Unreachable while the
    /// turn controller's invariants hold; treated as a contract
    /// violation if it occurs.
    #[display("illegal move: {_0}")]
    IllegalMove(String),
    /// The reply did not match the protocol shape.
    #[display("malformed arbiter reply: {_0}")]
    Protocol(String),
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Transport(e)
    }
}

/// Reply to a round-start request.
#[derive(Debug, Clone)]
pub struct RoundStart {
    /// Initial board (normally empty).
    pub board: Board,
    /// Player 1's name as resolved by the arbiter.
    pub player1_name: String,
    /// Player 2's name as resolved by the arbiter (the AI display name
    /// in AI mode).
    pub player2_name: String,
    /// Score counters carried into the round.
    pub scores: Scores,
    /// Mark that moves first this round.
    pub first_to_move: Mark,
    /// The opening move belongs to the AI and should be fetched after
    /// the thinking delay.
    pub ai_pending: bool,
}

/// Reply to a move-applying request (`make-move` or `ai-move`).
#[derive(Debug, Clone)]
pub struct MoveReply {
    /// Complete board after the move.
    pub board: Board,
    /// Complete history of the round after the move.
    pub history: Vec<MoveRecord>,
    /// The round ended with this move.
    pub game_over: bool,
    /// Winning mark when the round ended; `None` with `game_over`
    /// denotes a draw.
    pub winner: Option<Mark>,
    /// Winner's display name, when there is one.
    pub winner_name: Option<String>,
    /// Mark to move next while the round continues.
    pub next_to_move: Option<Mark>,
    /// The next move belongs to the AI.
    pub ai_pending: bool,
    /// Score snapshot, present at least on round end.
    pub scores: Option<Scores>,
}

/// Interface to the external arbiter resolving moves.
#[async_trait]
pub trait MoveGateway: Send + Sync {
    /// Requests a fresh board for the configured session.
    async fn start_round(
        &self,
        config: &SessionConfig,
        reset_scores: bool,
    ) -> Result<RoundStart, GatewayError>;

    /// Requests application of a human move.
    async fn submit_move(&self, position: Position) -> Result<MoveReply, GatewayError>;

    /// Requests that the arbiter select and apply the AI's move.
    async fn request_ai_move(&self) -> Result<MoveReply, GatewayError>;
}

// ─────────────────────────────────────────────────────────────
//  Wire DTOs
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct NewGameBody<'a> {
    mode: &'static str,
    player1_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    player2_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ai_opponent: Option<&'static str>,
    reset_scores: bool,
    delay_ai: bool,
}

#[derive(Debug, Serialize)]
struct MoveBody {
    position: u8,
    delay_ai: bool,
}

#[derive(Debug, Deserialize)]
struct RawRoundStart {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    board: Option<Vec<i64>>,
    #[serde(default)]
    player1_name: Option<String>,
    #[serde(default)]
    player2_name: Option<String>,
    #[serde(default)]
    scores: Option<Scores>,
    #[serde(default)]
    current_player: Option<Mark>,
    #[serde(default)]
    ai_pending: bool,
}

impl RawRoundStart {
    fn into_round_start(self) -> Result<RoundStart, GatewayError> {
        if !self.success {
            return Err(classify_failure(self.error));
        }
        let board = self
            .board
            .ok_or_else(|| GatewayError::Protocol("missing board".to_string()))?;
        let board = Board::decode(&board).map_err(|e| GatewayError::Protocol(e.to_string()))?;
        Ok(RoundStart {
            board,
            player1_name: self
                .player1_name
                .ok_or_else(|| GatewayError::Protocol("missing player1_name".to_string()))?,
            player2_name: self
                .player2_name
                .ok_or_else(|| GatewayError::Protocol("missing player2_name".to_string()))?,
            scores: self
                .scores
                .ok_or_else(|| GatewayError::Protocol("missing scores".to_string()))?,
            first_to_move: self
                .current_player
                .ok_or_else(|| GatewayError::Protocol("missing current_player".to_string()))?,
            ai_pending: self.ai_pending,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawMove {
    move_number: u32,
    player: String,
    symbol: Mark,
    position: usize,
}

#[derive(Debug, Deserialize)]
struct RawMoveReply {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    board: Option<Vec<i64>>,
    #[serde(default)]
    moves_history: Vec<RawMove>,
    #[serde(default)]
    move_count: Option<u32>,
    #[serde(default)]
    game_over: bool,
    #[serde(default)]
    winner: Option<String>,
    #[serde(default)]
    winner_name: Option<String>,
    #[serde(default)]
    current_player: Option<Mark>,
    #[serde(default)]
    ai_pending: bool,
    #[serde(default)]
    scores: Option<Scores>,
    // Legacy single-call AI protocol. The delayed two-phase protocol is
    // canonical; this field is tolerated and ignored.
    #[serde(default)]
    #[allow(dead_code)]
    ai_move: Option<i64>,
}

impl RawMoveReply {
    fn into_move_reply(self) -> Result<MoveReply, GatewayError> {
        if !self.success {
            return Err(classify_failure(self.error));
        }
        let board = self
            .board
            .ok_or_else(|| GatewayError::Protocol("missing board".to_string()))?;
        let board = Board::decode(&board).map_err(|e| GatewayError::Protocol(e.to_string()))?;

        let mut history = Vec::with_capacity(self.moves_history.len());
        for raw in self.moves_history {
            let position = Position::from_index(raw.position).ok_or_else(|| {
                GatewayError::Protocol(format!("history position {} out of range", raw.position))
            })?;
            history.push(MoveRecord {
                move_number: raw.move_number,
                player: raw.player,
                mark: raw.symbol,
                position,
            });
        }
        if let Some(count) = self.move_count {
            if count as usize != history.len() {
                return Err(GatewayError::Protocol(format!(
                    "move_count {} disagrees with history length {}",
                    count,
                    history.len()
                )));
            }
        }

        let winner = match self.winner.as_deref() {
            Some("X") => Some(Mark::X),
            Some("O") => Some(Mark::O),
            Some("draw") | None => None,
            Some(other) => {
                return Err(GatewayError::Protocol(format!("unknown winner {other:?}")));
            }
        };
        if !self.game_over && self.current_player.is_none() {
            return Err(GatewayError::Protocol(
                "round continues but current_player is missing".to_string(),
            ));
        }

        Ok(MoveReply {
            board,
            history,
            game_over: self.game_over,
            winner,
            winner_name: self.winner_name,
            next_to_move: self.current_player,
            ai_pending: self.ai_pending,
            scores: self.scores,
        })
    }
}

// The arbiter signals move-legality rejections through the same
// success/error envelope as any other failure; these two messages are
// its legality vocabulary.
fn classify_failure(error: Option<String>) -> GatewayError {
    let message = error.unwrap_or_else(|| "no error message".to_string());
    match message.as_str() {
        "Invalid move" | "Game is over" => GatewayError::IllegalMove(message),
        _ => GatewayError::Rejected(message),
    }
}

// ─────────────────────────────────────────────────────────────
//  HTTP implementation
// ─────────────────────────────────────────────────────────────

/// HTTP gateway speaking the arbiter's JSON protocol.
///
/// The arbiter tracks the active round in a session cookie, so the
/// underlying client keeps a cookie store.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Creates a gateway for the arbiter at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}/api/{}", self.base_url.trim_end_matches('/'), endpoint);
        debug!(url = %url, "Sending arbiter request");
        let response = self.client.post(&url).json(body).send().await?;
        let response = response.error_for_status()?;
        response
            .json::<R>()
            .await
            .map_err(|e| GatewayError::Protocol(e.to_string()))
    }
}

#[async_trait]
impl MoveGateway for HttpGateway {
    #[instrument(skip(self, config), fields(mode = config.mode.wire_id()))]
    async fn start_round(
        &self,
        config: &SessionConfig,
        reset_scores: bool,
    ) -> Result<RoundStart, GatewayError> {
        info!("Requesting new round");
        let body = NewGameBody {
            mode: config.mode.wire_id(),
            player1_name: &config.player1_name,
            player2_name: config.player2_name.as_deref(),
            ai_opponent: config.ai_opponent.map(|ai| ai.wire_id()),
            reset_scores,
            delay_ai: true,
        };
        let raw: RawRoundStart = self.post("new-game", &body).await?;
        let start = raw.into_round_start()?;
        debug!(
            first_to_move = %start.first_to_move,
            ai_pending = start.ai_pending,
            "Round started"
        );
        Ok(start)
    }

    #[instrument(skip(self), fields(position = %position))]
    async fn submit_move(&self, position: Position) -> Result<MoveReply, GatewayError> {
        info!("Submitting move");
        let body = MoveBody {
            position: position.to_index() as u8,
            delay_ai: true,
        };
        let raw: RawMoveReply = self.post("make-move", &body).await?;
        raw.into_move_reply()
    }

    #[instrument(skip(self))]
    async fn request_ai_move(&self) -> Result<MoveReply, GatewayError> {
        info!("Requesting AI move");
        let raw: RawMoveReply = self.post("ai-move", &serde_json::json!({})).await?;
        raw.into_move_reply()
    }
}
