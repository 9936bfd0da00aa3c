//! Session state-machine tests, driven directly against [`goban::Session`].
//!
//! Every operation returns the events it produced, so these tests assert on
//! the event stream as well as the resulting state.

use goban::{
    Move, Point, RuleViolation, Session, SessionError, SessionEvent, SessionState, Stone,
};

fn started_session(size: usize) -> Session {
    let mut session = Session::new(size);
    session.register().expect("player 1");
    session.register().expect("player 2");
    let events = session.start();
    assert!(!events.is_empty(), "start should emit events");
    session
}

fn mv(row: i32, col: i32, player: u8) -> Move {
    Move::new(row, col, player)
}

fn has_rejection(events: &[SessionEvent], player: u8, violation: RuleViolation) -> bool {
    events.iter().any(|e| {
        matches!(e, SessionEvent::ErrorFor { player: p, message }
            if *p == player && *message == violation.to_string())
    })
}

fn has_game_over(events: &[SessionEvent], expected: &str) -> bool {
    events
        .iter()
        .any(|e| matches!(e, SessionEvent::GameOver { message } if message == expected))
}

fn board_updates(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SessionEvent::BoardUpdated(_)))
        .count()
}

#[test]
fn test_roster_caps_at_two_players() {
    let mut session = Session::new(9);
    assert_eq!(session.register(), Ok(1));
    assert_eq!(session.register(), Ok(2));
    assert_eq!(session.register(), Err(SessionError::RosterFull));
    assert_eq!(session.roster(), &[1, 2]);
}

#[test]
fn test_start_requires_exactly_two_players() {
    let mut session = Session::new(9);
    session.register().expect("player 1");
    assert!(session.start().is_empty());
    assert_eq!(session.state(), SessionState::WaitingForPlayers);
}

#[test]
fn test_start_assigns_ids_and_gives_player_one_the_turn() {
    let mut session = Session::new(9);
    session.register().expect("player 1");
    session.register().expect("player 2");

    let events = session.start();
    assert!(events.contains(&SessionEvent::PlayerAssigned { player: 1 }));
    assert!(events.contains(&SessionEvent::PlayerAssigned { player: 2 }));
    assert_eq!(board_updates(&events), 1);
    assert!(events.contains(&SessionEvent::TurnChanged { current: 1 }));
    assert_eq!(session.state(), SessionState::InProgress);
    assert_eq!(session.current_player(), 1);

    // Starting again is a no-op.
    assert!(session.start().is_empty());
}

#[test]
fn test_move_before_start_is_rejected() {
    let mut session = Session::new(9);
    session.register().expect("player 1");

    let events = session.apply_move(mv(0, 0, 1), 1);
    assert!(has_rejection(&events, 1, RuleViolation::NotYourTurn));
    assert_eq!(session.board().point(0, 0), Some(Point::Empty));
}

#[test]
fn test_out_of_turn_move_rejected_without_mutation() {
    let mut session = started_session(9);

    let events = session.apply_move(mv(0, 0, 2), 2);
    assert!(has_rejection(&events, 2, RuleViolation::NotYourTurn));
    assert_eq!(session.current_player(), 1);
    assert_eq!(session.board().point(0, 0), Some(Point::Empty));
}

#[test]
fn test_spoofed_player_id_rejected() {
    let mut session = started_session(9);

    let events = session.apply_move(mv(0, 0, 2), 1);
    assert!(has_rejection(&events, 1, RuleViolation::PlayerIdMismatch));
    assert_eq!(session.current_player(), 1);
}

#[test]
fn test_accepted_move_broadcasts_and_flips_turn() {
    let mut session = started_session(9);

    let events = session.apply_move(mv(4, 4, 1), 1);
    assert_eq!(board_updates(&events), 1);
    assert!(events.contains(&SessionEvent::TurnChanged { current: 2 }));
    assert_eq!(session.board().point(4, 4), Some(Point::Occupied(Stone::Black)));
    assert_eq!(session.current_player(), 2);
}

#[test]
fn test_board_rejection_goes_to_requester_only() {
    let mut session = started_session(9);
    session.apply_move(mv(0, 0, 1), 1);

    let events = session.apply_move(mv(0, 0, 2), 2);
    assert_eq!(
        events,
        vec![SessionEvent::ErrorFor {
            player: 2,
            message: RuleViolation::Occupied.to_string(),
        }]
    );
    assert_eq!(session.current_player(), 2);
}

#[test]
fn test_capture_emits_info_broadcast() {
    let mut session = started_session(9);
    session.apply_move(mv(0, 1, 1), 1);
    session.apply_move(mv(0, 0, 2), 2);

    let events = session.apply_move(mv(1, 0, 1), 1);
    assert!(events.iter().any(|e| {
        matches!(e, SessionEvent::Info { message, .. }
            if message == "Player 1 captured 1 stone(s).")
    }));
    assert_eq!(session.board().point(0, 0), Some(Point::Empty));
}

/// Builds the classic corner ko: white on (0,1) and (1,0), black on (0,2)
/// and (1,1), black to move. Black's capture at (0,0) takes exactly the
/// white stone at (0,1); white recapturing at (0,1) would recreate this
/// position.
fn ko_position() -> Session {
    let mut session = started_session(3);
    session.apply_move(mv(1, 1, 1), 1);
    session.apply_move(mv(0, 1, 2), 2);
    session.apply_move(mv(0, 2, 1), 1);
    session.apply_move(mv(1, 0, 2), 2);
    assert_eq!(session.current_player(), 1);
    session
}

#[test]
fn test_immediate_ko_recapture_rejected() {
    let mut session = ko_position();

    let events = session.apply_move(mv(0, 0, 1), 1);
    assert!(events.iter().any(|e| {
        matches!(e, SessionEvent::Info { message, .. }
            if message == "Player 1 captured 1 stone(s).")
    }));
    let after_capture = session.board().snapshot();

    // White's recapture would restore the pre-capture position exactly.
    let events = session.apply_move(mv(0, 1, 2), 2);
    assert!(has_rejection(&events, 2, RuleViolation::KoViolation));
    assert_eq!(session.board(), &after_capture);
    assert_eq!(session.current_player(), 2);

    // Any other point is still open to white.
    let events = session.apply_move(mv(2, 2, 2), 2);
    assert!(!has_rejection(&events, 2, RuleViolation::KoViolation));
    assert_eq!(session.current_player(), 1);
}

#[test]
fn test_pass_reanchors_ko_reference() {
    let mut session = ko_position();
    session.apply_move(mv(0, 0, 1), 1);

    // White passes instead of recapturing; the ko reference moves to the
    // current position, so the recapture is legal one turn later.
    session.pass(2);
    session.apply_move(mv(2, 2, 1), 1);

    let events = session.apply_move(mv(0, 1, 2), 2);
    assert!(!has_rejection(&events, 2, RuleViolation::KoViolation));
    assert_eq!(board_updates(&events), 1);
    assert_eq!(session.board().point(0, 0), Some(Point::Empty));
}

#[test]
fn test_pass_then_move_resets_counter() {
    let mut session = started_session(9);

    let events = session.pass(1);
    assert!(events.iter().any(|e| {
        matches!(e, SessionEvent::Info { message, .. } if message == "Player 1 passed.")
    }));
    assert_eq!(session.consecutive_passes(), 1);
    assert_eq!(session.current_player(), 2);

    session.apply_move(mv(3, 3, 2), 2);
    assert_eq!(session.consecutive_passes(), 0);
    assert_eq!(session.state(), SessionState::InProgress);
}

#[test]
fn test_double_pass_finishes_with_final_board() {
    let mut session = started_session(9);

    session.pass(1);
    let events = session.pass(2);
    assert!(has_game_over(&events, "Both players passed"));
    assert_eq!(board_updates(&events), 1);
    assert_eq!(session.state(), SessionState::Finished);

    let events = session.apply_move(mv(0, 0, 1), 1);
    assert!(has_rejection(&events, 1, RuleViolation::GameAlreadyFinished));
}

#[test]
fn test_out_of_turn_pass_rejected() {
    let mut session = started_session(9);
    let events = session.pass(2);
    assert!(has_rejection(&events, 2, RuleViolation::NotYourTurn));
    assert_eq!(session.consecutive_passes(), 0);
}

#[test]
fn test_resign_names_the_other_player_winner() {
    let mut session = started_session(9);

    // Player 2 resigns although it is player 1's turn.
    let events = session.resign(2);
    assert!(has_game_over(&events, "Player 1 wins (resign)"));
    assert_eq!(session.state(), SessionState::Finished);

    let events = session.resign(1);
    assert!(has_rejection(&events, 1, RuleViolation::GameAlreadyFinished));
}

#[test]
fn test_resign_allowed_before_start() {
    let mut session = Session::new(9);
    session.register().expect("player 1");
    session.register().expect("player 2");

    let events = session.resign(1);
    assert!(has_game_over(&events, "Player 2 wins (resign)"));
    assert_eq!(session.state(), SessionState::Finished);
}

#[test]
fn test_disconnect_force_ends_and_is_idempotent() {
    let mut session = started_session(9);

    let events = session.disconnect(2);
    assert!(events.contains(&SessionEvent::ErrorFor {
        player: 1,
        message: "Opponent disconnected. Game ended.".into(),
    }));
    assert!(has_game_over(&events, "Opponent disconnected"));
    assert_eq!(session.state(), SessionState::Finished);
    assert_eq!(session.roster(), &[1]);

    assert!(session.disconnect(2).is_empty());
    assert!(session.disconnect(1).is_empty());
}

#[test]
fn test_disconnect_after_finish_stays_quiet() {
    let mut session = started_session(9);
    session.resign(1);

    assert!(session.disconnect(1).is_empty());
    assert!(session.disconnect(2).is_empty());
}
