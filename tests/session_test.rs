//! Session orchestration tests against a scripted mock gateway.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tictactoe_client::{
    AiOpponent, Board, GameSession, GatewayError, Mark, MoveGateway, MoveRecord, MoveReply,
    Outcome, PlayerSlot, Position, RoundStart, Scores, SessionConfig, TurnState,
};

/// Counts every gateway call the session issues.
#[derive(Default)]
struct CallCounts {
    start: AtomicUsize,
    human: AtomicUsize,
    ai: AtomicUsize,
}

/// Gateway that replays a scripted sequence of replies.
struct MockGateway {
    starts: Mutex<VecDeque<Result<RoundStart, GatewayError>>>,
    moves: Mutex<VecDeque<Result<MoveReply, GatewayError>>>,
    ai_moves: Mutex<VecDeque<Result<MoveReply, GatewayError>>>,
    counts: Arc<CallCounts>,
}

impl MockGateway {
    fn new() -> (Self, Arc<CallCounts>) {
        let counts = Arc::new(CallCounts::default());
        (
            Self {
                starts: Mutex::new(VecDeque::new()),
                moves: Mutex::new(VecDeque::new()),
                ai_moves: Mutex::new(VecDeque::new()),
                counts: counts.clone(),
            },
            counts,
        )
    }

    fn script_start(&self, reply: Result<RoundStart, GatewayError>) {
        self.starts.lock().unwrap().push_back(reply);
    }

    fn script_move(&self, reply: Result<MoveReply, GatewayError>) {
        self.moves.lock().unwrap().push_back(reply);
    }

    fn script_ai_move(&self, reply: Result<MoveReply, GatewayError>) {
        self.ai_moves.lock().unwrap().push_back(reply);
    }
}

#[async_trait]
impl MoveGateway for MockGateway {
    async fn start_round(
        &self,
        _config: &SessionConfig,
        _reset_scores: bool,
    ) -> Result<RoundStart, GatewayError> {
        self.counts.start.fetch_add(1, Ordering::SeqCst);
        self.starts
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted start_round call")
    }

    async fn submit_move(&self, _position: Position) -> Result<MoveReply, GatewayError> {
        self.counts.human.fetch_add(1, Ordering::SeqCst);
        self.moves
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted submit_move call")
    }

    async fn request_ai_move(&self) -> Result<MoveReply, GatewayError> {
        self.counts.ai.fetch_add(1, Ordering::SeqCst);
        self.ai_moves
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted request_ai_move call")
    }
}

fn start_reply(
    p2_name: &str,
    scores: Scores,
    first_to_move: Mark,
    ai_pending: bool,
) -> RoundStart {
    RoundStart {
        board: Board::new(),
        player1_name: "Player 1".to_string(),
        player2_name: p2_name.to_string(),
        scores,
        first_to_move,
        ai_pending,
    }
}

fn record(n: u32, player: &str, mark: Mark, index: usize) -> MoveRecord {
    MoveRecord {
        move_number: n,
        player: player.to_string(),
        mark,
        position: Position::from_index(index).unwrap(),
    }
}

fn continuing(
    wire_board: [i64; 9],
    history: Vec<MoveRecord>,
    next_to_move: Mark,
    ai_pending: bool,
) -> MoveReply {
    MoveReply {
        board: Board::decode(&wire_board).unwrap(),
        history,
        game_over: false,
        winner: None,
        winner_name: None,
        next_to_move: Some(next_to_move),
        ai_pending,
        scores: None,
    }
}

fn finished(
    wire_board: [i64; 9],
    history: Vec<MoveRecord>,
    winner: Option<Mark>,
    winner_name: Option<&str>,
    scores: Scores,
) -> MoveReply {
    MoveReply {
        board: Board::decode(&wire_board).unwrap(),
        history,
        game_over: true,
        winner,
        winner_name: winner_name.map(str::to_string),
        next_to_move: None,
        ai_pending: false,
        scores: Some(scores),
    }
}

fn pvp_session(gateway: MockGateway) -> GameSession {
    GameSession::new(SessionConfig::pvp("", ""), Box::new(gateway))
        .with_ai_delay(Duration::ZERO)
}

fn pva_session(gateway: MockGateway) -> GameSession {
    GameSession::new(SessionConfig::pva("Ada", AiOpponent::Zeus), Box::new(gateway))
        .with_ai_delay(Duration::ZERO)
}

#[tokio::test]
async fn pvp_move_advances_turn_and_records_history() {
    let (gateway, _counts) = MockGateway::new();
    gateway.script_start(Ok(start_reply(
        "Player 2",
        Scores::default(),
        Mark::X,
        false,
    )));
    gateway.script_move(Ok(continuing(
        [0, 0, 0, 0, 1, 0, 0, 0, 0],
        vec![record(1, "Player 1", Mark::X, 4)],
        Mark::O,
        false,
    )));
    let mut session = pvp_session(gateway);

    let frame = session.start_new_round(true).await;
    assert_eq!(session.scores(), Scores::default());
    assert_eq!(
        session.controller().state(),
        TurnState::AwaitingHumanMove(PlayerSlot::One)
    );
    assert!(frame.input_mask.iter().all(|enabled| *enabled));

    let frame = session.player_move(Position::Center).await;
    assert_eq!(
        session.controller().state(),
        TurnState::AwaitingHumanMove(PlayerSlot::Two)
    );
    assert_eq!(session.history().count(), 1);
    assert_eq!(
        session.history().records()[0],
        record(1, "Player 1", Mark::X, 4)
    );
    // Complete-snapshot invariant: history mirrors the board exactly.
    assert_eq!(session.history().count(), session.board().occupied_count());
    assert!(!frame.input_mask[Position::Center.to_index()]);
    assert!(frame.input_mask[Position::TopLeft.to_index()]);
}

#[tokio::test]
async fn ai_opening_is_deferred_until_resolved() {
    let (gateway, counts) = MockGateway::new();
    gateway.script_start(Ok(start_reply("Zeus", Scores::default(), Mark::O, true)));
    gateway.script_ai_move(Ok(continuing(
        [0, 0, 0, 0, -1, 0, 0, 0, 0],
        vec![record(1, "Zeus", Mark::O, 4)],
        Mark::X,
        false,
    )));
    let mut session = pva_session(gateway);

    let frame = session.start_new_round(true).await;
    assert_eq!(
        session.controller().state(),
        TurnState::AwaitingAIMove(PlayerSlot::Two)
    );
    assert!(session.ai_move_pending());
    assert!(frame.input_mask.iter().all(|enabled| !*enabled));
    // Entering AwaitingAIMove does not fetch the move yet.
    assert_eq!(counts.ai.load(Ordering::SeqCst), 0);

    let frame = session.resolve_pending_ai().await;
    assert_eq!(counts.ai.load(Ordering::SeqCst), 1);
    assert_eq!(
        session.controller().state(),
        TurnState::AwaitingHumanMove(PlayerSlot::One)
    );
    assert_eq!(session.history().count(), 1);
    assert_eq!(session.history().records()[0].mark, Mark::O);
    assert_eq!(session.history().count(), session.board().occupied_count());
    assert!(frame.input_mask[Position::TopLeft.to_index()]);
    assert!(!frame.input_mask[Position::Center.to_index()]);
}

#[tokio::test]
async fn cell_input_is_noop_during_ai_turn() {
    let (gateway, counts) = MockGateway::new();
    gateway.script_start(Ok(start_reply("Zeus", Scores::default(), Mark::O, true)));
    let mut session = pva_session(gateway);

    session.start_new_round(true).await;
    let before = session.controller().state();

    let frame = session.player_move(Position::Center).await;
    assert_eq!(counts.human.load(Ordering::SeqCst), 0);
    assert_eq!(session.controller().state(), before);
    assert_eq!(session.history().count(), 0);
    assert!(frame.notice.is_none());
}

#[tokio::test]
async fn winning_move_ends_round_with_arbiter_scores() {
    let (gateway, _counts) = MockGateway::new();
    gateway.script_start(Ok(start_reply("Zeus", Scores::default(), Mark::X, false)));
    gateway.script_move(Ok(finished(
        [1, 1, 1, -1, -1, 0, 0, 0, 0],
        vec![
            record(1, "Ada", Mark::X, 0),
            record(2, "Zeus", Mark::O, 3),
            record(3, "Ada", Mark::X, 1),
            record(4, "Zeus", Mark::O, 4),
            record(5, "Ada", Mark::X, 2),
        ],
        Some(Mark::X),
        Some("Ada"),
        Scores {
            player1_wins: 1,
            player2_wins: 0,
            draws: 0,
        },
    )));
    let mut session = pva_session(gateway);

    session.start_new_round(true).await;
    let frame = session.player_move(Position::TopRight).await;

    assert_eq!(
        session.controller().state(),
        TurnState::RoundOver(Outcome::Win(PlayerSlot::One))
    );
    assert_eq!(session.scores().player1_wins, 1);
    assert!(frame.input_mask.iter().all(|enabled| !*enabled));
    assert_eq!(session.history().count(), session.board().occupied_count());

    let frame = session.continue_after_round_over();
    let modal = frame.modal.expect("round over should produce a modal");
    assert_eq!(modal.title, "Victory!");
    assert!(modal.message.contains("Ada"));
}

#[tokio::test]
async fn draw_ends_round_with_draw_outcome() {
    let (gateway, _counts) = MockGateway::new();
    gateway.script_start(Ok(start_reply(
        "Player 2",
        Scores::default(),
        Mark::X,
        false,
    )));
    gateway.script_move(Ok(finished(
        [1, -1, 1, 1, -1, -1, -1, 1, 1],
        (1..=9)
            .map(|n| {
                let (player, mark) = if n % 2 == 1 {
                    ("Player 1", Mark::X)
                } else {
                    ("Player 2", Mark::O)
                };
                // Positions in play order for the board above.
                let order = [0, 1, 2, 4, 3, 5, 7, 6, 8];
                record(n as u32, player, mark, order[n - 1])
            })
            .collect(),
        None,
        None,
        Scores {
            player1_wins: 0,
            player2_wins: 0,
            draws: 1,
        },
    )));
    let mut session = pvp_session(gateway);

    session.start_new_round(true).await;
    session.player_move(Position::BottomRight).await;

    assert_eq!(
        session.controller().state(),
        TurnState::RoundOver(Outcome::Draw)
    );
    assert_eq!(session.scores().draws, 1);

    let frame = session.continue_after_round_over();
    assert_eq!(frame.modal.unwrap().title, "It's a draw!");
}

#[tokio::test]
async fn play_again_keeps_scores_but_clears_round() {
    let (gateway, _counts) = MockGateway::new();
    let won = Scores {
        player1_wins: 1,
        player2_wins: 0,
        draws: 0,
    };
    gateway.script_start(Ok(start_reply("Zeus", Scores::default(), Mark::X, false)));
    gateway.script_move(Ok(finished(
        [1, 1, 1, -1, -1, 0, 0, 0, 0],
        vec![
            record(1, "Ada", Mark::X, 0),
            record(2, "Zeus", Mark::O, 3),
            record(3, "Ada", Mark::X, 1),
            record(4, "Zeus", Mark::O, 4),
            record(5, "Ada", Mark::X, 2),
        ],
        Some(Mark::X),
        Some("Ada"),
        won,
    )));
    // Play-again keeps the arbiter's counters.
    gateway.script_start(Ok(start_reply("Zeus", won, Mark::O, true)));
    let mut session = pva_session(gateway);

    session.start_new_round(true).await;
    session.player_move(Position::TopRight).await;
    let scores_before = session.scores();

    session.start_new_round(false).await;
    assert_eq!(session.scores(), scores_before);
    assert!(session.history().is_empty());
    assert_eq!(session.board().occupied_count(), 0);
    assert_eq!(
        session.controller().state(),
        TurnState::AwaitingAIMove(PlayerSlot::Two)
    );
}

#[tokio::test]
async fn return_to_setup_resets_everything() {
    let (gateway, _counts) = MockGateway::new();
    gateway.script_start(Ok(start_reply(
        "Zeus",
        Scores {
            player1_wins: 2,
            player2_wins: 1,
            draws: 0,
        },
        Mark::X,
        false,
    )));
    let mut session = pva_session(gateway);

    session.start_new_round(false).await;
    let frame = session.return_to_setup();

    assert_eq!(session.controller().state(), TurnState::Idle);
    assert_eq!(session.scores(), Scores::default());
    assert!(session.history().is_empty());
    assert_eq!(session.board().occupied_count(), 0);
    assert!(frame.input_mask.iter().all(|enabled| !*enabled));
}

#[tokio::test]
async fn failed_ai_move_preserves_state_for_retry() {
    let (gateway, counts) = MockGateway::new();
    gateway.script_start(Ok(start_reply("Zeus", Scores::default(), Mark::O, true)));
    gateway.script_ai_move(Err(GatewayError::Rejected("connection refused".to_string())));
    gateway.script_ai_move(Ok(continuing(
        [0, 0, 0, 0, -1, 0, 0, 0, 0],
        vec![record(1, "Zeus", Mark::O, 4)],
        Mark::X,
        false,
    )));
    let mut session = pva_session(gateway);

    session.start_new_round(true).await;
    let frame = session.resolve_pending_ai().await;

    assert_eq!(counts.ai.load(Ordering::SeqCst), 1);
    assert_eq!(
        session.controller().state(),
        TurnState::AwaitingAIMove(PlayerSlot::Two)
    );
    assert_eq!(session.history().count(), 0);
    assert!(frame.notice.is_some());
    assert!(frame.input_mask.iter().all(|enabled| !*enabled));

    // The next successful fetch recovers the round.
    session.resolve_pending_ai().await;
    assert_eq!(
        session.controller().state(),
        TurnState::AwaitingHumanMove(PlayerSlot::One)
    );
    assert_eq!(session.history().count(), 1);
}

#[tokio::test]
async fn failed_move_leaves_turn_with_the_player() {
    let (gateway, _counts) = MockGateway::new();
    gateway.script_start(Ok(start_reply(
        "Player 2",
        Scores::default(),
        Mark::X,
        false,
    )));
    gateway.script_move(Err(GatewayError::Rejected("boom".to_string())));
    gateway.script_move(Ok(continuing(
        [0, 0, 0, 0, 1, 0, 0, 0, 0],
        vec![record(1, "Player 1", Mark::X, 4)],
        Mark::O,
        false,
    )));
    let mut session = pvp_session(gateway);

    session.start_new_round(true).await;
    let frame = session.player_move(Position::Center).await;

    // State did not advance, so the same input can be retried.
    assert_eq!(
        session.controller().state(),
        TurnState::AwaitingHumanMove(PlayerSlot::One)
    );
    assert!(frame.notice.is_some());
    assert!(frame.input_mask[Position::Center.to_index()]);

    session.player_move(Position::Center).await;
    assert_eq!(session.history().count(), 1);
}

#[tokio::test]
async fn failed_round_start_changes_nothing() {
    let (gateway, _counts) = MockGateway::new();
    gateway.script_start(Err(GatewayError::Rejected("no route".to_string())));
    let mut session = pvp_session(gateway);

    let frame = session.start_new_round(true).await;
    assert_eq!(session.controller().state(), TurnState::Idle);
    assert!(frame.notice.is_some());
}

#[tokio::test]
async fn player_one_is_x_regardless_of_opener() {
    let (gateway, _counts) = MockGateway::new();
    // Round 1: human opens. Round 2: AI opens.
    gateway.script_start(Ok(start_reply("Zeus", Scores::default(), Mark::X, false)));
    gateway.script_start(Ok(start_reply("Zeus", Scores::default(), Mark::O, true)));
    let mut session = pva_session(gateway);

    session.start_new_round(true).await;
    assert_eq!(
        session.controller().state(),
        TurnState::AwaitingHumanMove(PlayerSlot::One)
    );

    session.start_new_round(false).await;
    // The opener changed but the seat-mark binding did not.
    assert_eq!(
        session.controller().state(),
        TurnState::AwaitingAIMove(PlayerSlot::Two)
    );
    assert_eq!(PlayerSlot::One.mark(), Mark::X);
    assert_eq!(PlayerSlot::Two.mark(), Mark::O);
}
