//! Integration tests for App session behavior.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - The transcript holds exactly the chat frames, in arrival order
//! - The roster reflects connected/left events with set semantics
//! - Connection state follows transport lifecycle events

use std::time::{Duration, SystemTime};

use partyline_app::{App, AppAction, AppError, AppEvent, ConnectionState, ReconcilerConfig};
use partyline_proto::{ChangeReason, Endpoint, Frame, UnmatchedPolicy};

fn app_with(identity: &str, config: &ReconcilerConfig) -> App {
    App::new(Endpoint::new("localhost:1999", "lobby", identity), config)
}

/// Create a connected App ready for testing.
fn connected_app(identity: &str) -> App {
    let mut app = app_with(identity, &ReconcilerConfig::default());
    app.handle(AppEvent::Opened);
    app
}

fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

/// Simulate receiving a frame from the room.
fn receive(app: &mut App, data: &str, secs: u64) -> Vec<AppAction> {
    app.handle(AppEvent::FrameReceived { frame: Frame::new(data), received_at: at(secs) })
}

#[test]
fn chat_frame_appends_to_transcript() {
    let mut app = connected_app("alice");
    receive(&mut app, r#"{"user":"a","message":"hi"}"#, 10);

    let transcript = app.transcript();
    assert_eq!(transcript.len(), 1);
    let entry = &transcript.as_slice()[0];
    assert_eq!(entry.user, "a");
    assert_eq!(entry.message, "hi");
    assert_eq!(entry.time, at(10));
}

#[test]
fn roster_follows_connect_and_leave() {
    let mut app = connected_app("alice");
    receive(&mut app, r#"{"user":"a","changeReason":"connected","connections":1}"#, 1);
    receive(&mut app, r#"{"user":"b","changeReason":"connected","connections":2}"#, 2);
    receive(&mut app, r#"{"user":"a","changeReason":"left","connections":1}"#, 3);

    let roster: Vec<&String> = app.roster().iter().collect();
    assert_eq!(roster, vec!["b"]);

    let latest = app.latest_presence().expect("presence recorded");
    assert_eq!(latest.connections, 1);
    assert_eq!(latest.change_reason, ChangeReason::Left);
    assert_eq!(app.presence_events().len(), 3);
}

#[test]
fn non_json_frame_is_logged() {
    let mut app = connected_app("alice");
    let actions = receive(&mut app, "not json", 1);

    assert_eq!(actions, vec![AppAction::Render]);
    let log: Vec<&String> = app.server_messages().iter().collect();
    assert_eq!(log, vec!["not json"]);
    assert!(app.transcript().is_empty());
    assert!(app.roster().is_empty());
}

#[test]
fn forged_time_is_replaced_by_receipt() {
    let mut app = connected_app("alice");
    receive(&mut app, r#"{"user":"a","message":"hi","time":"1999-01-01T00:00:00Z"}"#, 42);

    let entry = app.transcript().last().expect("chat appended");
    assert_eq!(entry.time, at(42));
    assert!(!entry.extra.contains_key("time"));
}

#[test]
fn drop_policy_ignores_unmatched_objects() {
    let config = ReconcilerConfig { unmatched: UnmatchedPolicy::Drop, ..Default::default() };
    let mut app = app_with("alice", &config);

    let actions = receive(&mut app, r#"{"type":"ping"}"#, 1);

    assert!(actions.is_empty());
    assert!(app.server_messages().is_empty());

    // Non-JSON is never dropped
    receive(&mut app, "hello from the server", 2);
    assert_eq!(app.server_messages().len(), 1);
}

#[test]
fn disabled_roster_still_tracks_latest_presence() {
    let config = ReconcilerConfig { track_roster: false, ..Default::default() };
    let mut app = app_with("alice", &config);

    receive(&mut app, r#"{"user":"a","changeReason":"connected","connections":3}"#, 1);

    assert!(app.roster().is_empty());
    assert_eq!(app.occupancy(), Some(3));
    assert!(!app.roster_may_be_incomplete());
}

#[test]
fn session_lifecycle() {
    let mut app = app_with("alice", &ReconcilerConfig::default());
    assert_eq!(app.connection_state(), &ConnectionState::Disconnected);

    let actions = app.connect();
    assert!(actions.iter().any(|a| matches!(a, AppAction::Connect { .. })));
    assert_eq!(app.connection_state(), &ConnectionState::Connecting);

    app.handle(AppEvent::Opened);
    assert_eq!(
        app.connection_state(),
        &ConnectionState::Connected { user_name: "alice".to_string() }
    );

    app.handle(AppEvent::Closed);
    assert_eq!(app.connection_state(), &ConnectionState::Disconnected);
    assert_eq!(app.connection_state().user_name(), None);

    app.handle(AppEvent::TransportError { message: "refused".into() });
    assert!(matches!(app.connection_state(), ConnectionState::Error { .. }));

    // Reconnect from error
    let actions = app.connect();
    assert!(actions.iter().any(|a| matches!(a, AppAction::Connect { .. })));
    assert_eq!(app.connection_state(), &ConnectionState::Connecting);
}

#[test]
fn projections_survive_reconnect() {
    let mut app = connected_app("alice");
    receive(&mut app, r#"{"user":"a","message":"before"}"#, 1);

    app.handle(AppEvent::Closed);
    app.connect();
    app.handle(AppEvent::Opened);
    receive(&mut app, r#"{"user":"a","message":"after"}"#, 2);

    let messages: Vec<&str> = app.transcript().iter().map(|m| m.message.as_str()).collect();
    assert_eq!(messages, vec!["before", "after"]);
}

#[test]
fn send_passes_text_through() {
    let app = connected_app("alice");

    assert_eq!(app.send_message(""), Err(AppError::EmptyMessage));
    assert_eq!(
        app.send_message(r#"{"not":"wrapped"}"#),
        Ok(vec![AppAction::Send { text: r#"{"not":"wrapped"}"#.to_string() }])
    );
}

#[test]
fn resize_redraws_and_tick_does_not() {
    let mut app = connected_app("alice");
    assert_eq!(app.handle(AppEvent::Resize(120, 40)), vec![AppAction::Render]);
    assert!(app.handle(AppEvent::Tick).is_empty());
}
