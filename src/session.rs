//! Game session: match lifecycle, turn order, ko bookkeeping, and the
//! single-owner actor that serializes all commands.
//!
//! The session itself ([`Session`]) is a plain state machine: every operation
//! mutates local state and returns the [`SessionEvent`]s it produced, without
//! touching any transport. One tokio task ([`spawn`]) owns the session and
//! drains a command queue, so commands from both connections execute in a
//! single total order; a [`Dispatcher`] maps each event to the correct
//! outbound channel(s). Connection contexts hold only a [`SessionHandle`].

use crate::error::{RuleViolation, SessionError};
use crate::games::go::{Board, Move, Stone};
use crate::protocol::Notice;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

/// Wire-level player id: 1 (black) or 2 (white).
pub type PlayerId = u8;

/// Lifecycle phase of the match. Transitions are monotonic:
/// WaitingForPlayers → InProgress → Finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Fewer than two players registered.
    WaitingForPlayers,
    /// Match running.
    InProgress,
    /// Terminal; no further play.
    Finished,
}

/// Addressing scope of an outbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every registered connection.
    Broadcast,
    /// One player only.
    To(PlayerId),
}

/// A discrete notification emitted by the session state machine.
///
/// Events carry domain data, not wire text; the dispatcher turns them into
/// protocol lines. This keeps the rule engine fully decoupled from transport.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A player learns its id at match start.
    PlayerAssigned {
        /// The id being assigned (sent to that player only).
        player: PlayerId,
    },
    /// The board changed (or the match started); broadcast.
    BoardUpdated(Board),
    /// Turn moved to `current`; each player gets the matching turn notice.
    TurnChanged {
        /// Player now to move.
        current: PlayerId,
    },
    /// Informational message.
    Info {
        /// Who receives it.
        scope: Scope,
        /// Human-readable text.
        message: String,
    },
    /// A rejection addressed to one player.
    ErrorFor {
        /// The addressee.
        player: PlayerId,
        /// Human-readable reason.
        message: String,
    },
    /// The match ended; broadcast with the reason.
    GameOver {
        /// Human-readable reason.
        message: String,
    },
}

/// Authoritative state for one two-player match.
#[derive(Debug)]
pub struct Session {
    board: Board,
    state: SessionState,
    current_player: PlayerId,
    consecutive_passes: u32,
    /// Position that a move may not recreate. Set to the pre-move position
    /// after every accepted move, and to the current position after a pass.
    ko_reference: Option<Board>,
    roster: Vec<PlayerId>,
}

impl Session {
    /// Creates a session waiting for players, with an empty board.
    #[instrument]
    pub fn new(board_size: usize) -> Self {
        info!(board_size, "Creating game session");
        Self {
            board: Board::new(board_size),
            state: SessionState::WaitingForPlayers,
            current_player: 1,
            consecutive_passes: 0,
            ko_reference: None,
            roster: Vec::new(),
        }
    }

    /// Current lifecycle phase.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Player to move.
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// Consecutive passes since the last accepted move.
    pub fn consecutive_passes(&self) -> u32 {
        self.consecutive_passes
    }

    /// The authoritative board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Registered player ids, in registration order.
    pub fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    /// Adds a player slot, assigning id 1 then 2.
    #[instrument(skip(self))]
    pub fn register(&mut self) -> Result<PlayerId, SessionError> {
        if self.roster.len() >= 2 {
            warn!("Registration rejected, roster full");
            return Err(SessionError::RosterFull);
        }
        let id = self.roster.len() as PlayerId + 1;
        self.roster.push(id);
        info!(player = id, "Player registered");
        Ok(id)
    }

    /// Starts the match once exactly two players are seated.
    ///
    /// No-op (empty event list) if already started or the roster is short.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> Vec<SessionEvent> {
        if self.state != SessionState::WaitingForPlayers {
            return Vec::new();
        }
        if self.roster.len() != 2 {
            debug!(players = self.roster.len(), "Need exactly 2 players to start");
            return Vec::new();
        }

        self.state = SessionState::InProgress;
        self.current_player = 1;
        self.consecutive_passes = 0;
        self.ko_reference = None;
        info!("Game started, player 1 to move");

        let mut events: Vec<SessionEvent> = self
            .roster
            .iter()
            .map(|&player| SessionEvent::PlayerAssigned { player })
            .collect();
        events.push(SessionEvent::BoardUpdated(self.board.snapshot()));
        events.push(SessionEvent::TurnChanged {
            current: self.current_player,
        });
        events
    }

    /// Attempts a placement on behalf of `requester`.
    ///
    /// Ko is checked strictly after capture resolution and strictly before
    /// the turn flip: a capturing move can still be rejected for recreating
    /// the pre-move position, in which case the board is rolled back.
    #[instrument(skip(self, mov), fields(row = mov.row, col = mov.col, player = mov.player))]
    pub fn apply_move(&mut self, mov: Move, requester: PlayerId) -> Vec<SessionEvent> {
        if self.state == SessionState::Finished {
            return self.reject(requester, RuleViolation::GameAlreadyFinished);
        }
        if mov.player != requester {
            return self.reject(requester, RuleViolation::PlayerIdMismatch);
        }
        if self.state != SessionState::InProgress || requester != self.current_player {
            return self.reject(requester, RuleViolation::NotYourTurn);
        }
        let stone = match Stone::from_id(requester) {
            Some(stone) => stone,
            None => return self.reject(requester, RuleViolation::PlayerIdMismatch),
        };

        let before = self.board.snapshot();
        let captured = match self.board.apply(mov.row, mov.col, stone) {
            Ok(captured) => captured,
            Err(violation) => return self.reject(requester, violation),
        };

        if let Some(ko) = &self.ko_reference {
            if self.board == *ko {
                self.board.restore(&before);
                warn!(player = requester, "Move rejected by ko rule");
                return self.reject(requester, RuleViolation::KoViolation);
            }
        }

        self.ko_reference = Some(before);
        self.consecutive_passes = 0;
        info!(player = requester, captured, "Move accepted");

        let mut events = vec![SessionEvent::BoardUpdated(self.board.snapshot())];
        if captured > 0 {
            events.push(SessionEvent::Info {
                scope: Scope::Broadcast,
                message: format!("Player {requester} captured {captured} stone(s)."),
            });
        }
        self.flip_turn();
        events.push(SessionEvent::TurnChanged {
            current: self.current_player,
        });
        events
    }

    /// Passes the turn.
    ///
    /// The ko reference is re-anchored to the current, unchanged position so
    /// a move immediately following a pass is never falsely flagged against
    /// a pre-pass position. Two consecutive passes end the match.
    #[instrument(skip(self))]
    pub fn pass(&mut self, requester: PlayerId) -> Vec<SessionEvent> {
        if self.state == SessionState::Finished {
            return self.reject(requester, RuleViolation::GameAlreadyFinished);
        }
        if self.state != SessionState::InProgress || requester != self.current_player {
            return self.reject(requester, RuleViolation::NotYourTurn);
        }

        let mut events = vec![SessionEvent::Info {
            scope: Scope::Broadcast,
            message: format!("Player {requester} passed."),
        }];

        self.ko_reference = Some(self.board.snapshot());
        self.consecutive_passes += 1;
        info!(player = requester, passes = self.consecutive_passes, "Pass");

        if self.consecutive_passes >= 2 {
            self.state = SessionState::Finished;
            info!("Both players passed, game over");
            events.push(SessionEvent::Info {
                scope: Scope::Broadcast,
                message: "Both players passed. Game over.".into(),
            });
            events.push(SessionEvent::BoardUpdated(self.board.snapshot()));
            events.push(SessionEvent::GameOver {
                message: "Both players passed".into(),
            });
            return events;
        }

        self.flip_turn();
        events.push(SessionEvent::TurnChanged {
            current: self.current_player,
        });
        events
    }

    /// Forfeits the match; the other registered player wins.
    #[instrument(skip(self))]
    pub fn resign(&mut self, requester: PlayerId) -> Vec<SessionEvent> {
        if self.state == SessionState::Finished {
            return self.reject(requester, RuleViolation::GameAlreadyFinished);
        }
        let winner = Self::opponent(requester);
        self.state = SessionState::Finished;
        info!(player = requester, winner, "Resignation");
        vec![
            SessionEvent::Info {
                scope: Scope::Broadcast,
                message: format!("Player {requester} resigned. Player {winner} wins."),
            },
            SessionEvent::GameOver {
                message: format!("Player {winner} wins (resign)"),
            },
        ]
    }

    /// Handles a dropped connection.
    ///
    /// Removes the slot and, if the match was still live, force-ends it and
    /// notifies the remaining connection(s). Idempotent on repeat calls.
    #[instrument(skip(self))]
    pub fn disconnect(&mut self, player: PlayerId) -> Vec<SessionEvent> {
        self.roster.retain(|&id| id != player);
        if self.state == SessionState::Finished {
            return Vec::new();
        }
        self.state = SessionState::Finished;
        info!(player, "Player disconnected, ending game");

        let mut events: Vec<SessionEvent> = self
            .roster
            .iter()
            .map(|&remaining| SessionEvent::ErrorFor {
                player: remaining,
                message: "Opponent disconnected. Game ended.".into(),
            })
            .collect();
        events.push(SessionEvent::GameOver {
            message: "Opponent disconnected".into(),
        });
        events
    }

    fn flip_turn(&mut self) {
        self.current_player = Self::opponent(self.current_player);
    }

    fn opponent(player: PlayerId) -> PlayerId {
        if player == 1 { 2 } else { 1 }
    }

    fn reject(&self, player: PlayerId, violation: RuleViolation) -> Vec<SessionEvent> {
        debug!(player, %violation, "Rejecting command");
        vec![SessionEvent::ErrorFor {
            player,
            message: violation.to_string(),
        }]
    }
}

/// A command on the session's serialized queue.
#[derive(Debug)]
pub enum SessionCommand {
    /// Seat a new player; replies with the assigned id or `RosterFull`.
    Register {
        /// Line channel for everything the session will send this player.
        outbound: mpsc::UnboundedSender<String>,
        /// Registration result, delivered once.
        reply: oneshot::Sender<Result<PlayerId, SessionError>>,
    },
    /// Attempt a placement.
    Move {
        /// Authenticated id of the submitting connection.
        player: PlayerId,
        /// The decoded move (player field already overridden).
        mov: Move,
    },
    /// Pass the turn.
    Pass {
        /// Authenticated id of the submitting connection.
        player: PlayerId,
    },
    /// Forfeit the match.
    Resign {
        /// Authenticated id of the submitting connection.
        player: PlayerId,
    },
    /// Connection dropped.
    Disconnect {
        /// Id whose slot is vacated.
        player: PlayerId,
    },
}

/// Cloneable handle to the session actor, held by each connection context.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    /// Enqueues a command; `NotInitialized` if the actor is gone.
    pub fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.tx
            .send(command)
            .map_err(|_| SessionError::NotInitialized)
    }

    /// Registers a player and waits for the assigned id.
    pub async fn register(
        &self,
        outbound: mpsc::UnboundedSender<String>,
    ) -> Result<PlayerId, SessionError> {
        let (reply, response) = oneshot::channel();
        self.send(SessionCommand::Register { outbound, reply })?;
        response.await.map_err(|_| SessionError::NotInitialized)?
    }
}

/// Maps session events to the outbound line channel(s) of each player.
#[derive(Debug, Default)]
struct Dispatcher {
    outbound: HashMap<PlayerId, mpsc::UnboundedSender<String>>,
}

impl Dispatcher {
    fn attach(&mut self, player: PlayerId, tx: mpsc::UnboundedSender<String>) {
        self.outbound.insert(player, tx);
    }

    fn detach(&mut self, player: PlayerId) {
        self.outbound.remove(&player);
    }

    fn dispatch(&self, event: SessionEvent) {
        match event {
            SessionEvent::PlayerAssigned { player } => {
                self.send(player, Notice::Start(player));
            }
            SessionEvent::BoardUpdated(board) => self.broadcast(Notice::Board(board)),
            SessionEvent::TurnChanged { current } => {
                for &player in self.outbound.keys() {
                    let notice = if player == current {
                        Notice::YourTurn
                    } else {
                        Notice::OpponentTurn
                    };
                    self.send(player, notice);
                }
            }
            SessionEvent::Info { scope, message } => match scope {
                Scope::Broadcast => self.broadcast(Notice::Info(message)),
                Scope::To(player) => self.send(player, Notice::Info(message)),
            },
            SessionEvent::ErrorFor { player, message } => {
                self.send(player, Notice::Error(message));
            }
            SessionEvent::GameOver { message } => self.broadcast(Notice::GameOver(message)),
        }
    }

    fn send(&self, player: PlayerId, notice: Notice) {
        if let Some(tx) = self.outbound.get(&player) {
            if tx.send(notice.to_line()).is_err() {
                // Writer gone; the reader side will deliver the disconnect.
                debug!(player, "Dropping notice for closed connection");
            }
        }
    }

    fn broadcast(&self, notice: Notice) {
        let line = notice.to_line();
        for (&player, tx) in &self.outbound {
            if tx.send(line.clone()).is_err() {
                debug!(player, "Dropping broadcast for closed connection");
            }
        }
    }
}

/// Spawns the session actor and returns the handle connection contexts use.
///
/// The actor task owns all session and board state; commands from every
/// connection are processed in queue order, one at a time, which is the
/// serialization guarantee the rest of the crate relies on.
pub fn spawn(board_size: usize) -> SessionHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run(Session::new(board_size), rx));
    SessionHandle { tx }
}

async fn run(mut session: Session, mut commands: mpsc::UnboundedReceiver<SessionCommand>) {
    let mut dispatcher = Dispatcher::default();

    while let Some(command) = commands.recv().await {
        match command {
            SessionCommand::Register { outbound, reply } => {
                let result = session.register();
                if let Ok(player) = result {
                    dispatcher.attach(player, outbound);
                }
                if reply.send(result).is_err() {
                    // Connection died between enqueueing and hearing back.
                    if let Ok(player) = result {
                        dispatcher.detach(player);
                        for event in session.disconnect(player) {
                            dispatcher.dispatch(event);
                        }
                    }
                    continue;
                }
                if let Ok(player) = result {
                    // Greet from here so the greeting is ordered ahead of
                    // the start notices.
                    dispatcher.send(player, Notice::Info(format!("Connected as player {player}")));
                }
                // The second successful registration starts the match.
                for event in session.start() {
                    dispatcher.dispatch(event);
                }
            }
            SessionCommand::Move { player, mov } => {
                for event in session.apply_move(mov, player) {
                    dispatcher.dispatch(event);
                }
            }
            SessionCommand::Pass { player } => {
                for event in session.pass(player) {
                    dispatcher.dispatch(event);
                }
            }
            SessionCommand::Resign { player } => {
                for event in session.resign(player) {
                    dispatcher.dispatch(event);
                }
            }
            SessionCommand::Disconnect { player } => {
                dispatcher.detach(player);
                for event in session.disconnect(player) {
                    dispatcher.dispatch(event);
                }
            }
        }
    }
    debug!("Session command queue closed, actor exiting");
}
