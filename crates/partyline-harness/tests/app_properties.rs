//! Property-based tests for App state reconciliation.
//!
//! Tests verify that invariants hold under arbitrary frame and lifecycle
//! sequences, not just the hand-picked scenarios of the unit tests.

use std::time::{Duration, SystemTime};

use partyline_app::{App, AppEvent, ConnectionState, ReconcilerConfig};
use partyline_harness::{InvariantRegistry, SessionSnapshot};
use partyline_proto::{ChangeReason, Endpoint, Frame};
use proptest::prelude::*;
use serde_json::json;

/// Shape of a generated inbound frame.
#[derive(Debug, Clone)]
enum FrameSpec {
    Chat { user: String, message: String },
    Presence { user: String, reason: &'static str, connections: u64 },
    Garbage(String),
    Unmatched,
}

impl FrameSpec {
    fn raw(&self) -> String {
        match self {
            Self::Chat { user, message } => json!({ "user": user, "message": message }).to_string(),
            Self::Presence { user, reason, connections } => {
                json!({ "user": user, "changeReason": reason, "connections": connections })
                    .to_string()
            },
            Self::Garbage(text) => text.clone(),
            Self::Unmatched => json!({ "type": "ping" }).to_string(),
        }
    }

    fn is_chat(&self) -> bool {
        matches!(self, Self::Chat { .. })
    }
}

fn user_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(str::to_string)
}

fn frame_strategy() -> impl Strategy<Value = FrameSpec> {
    prop_oneof![
        3 => (user_strategy(), "[a-z ]{0,12}")
            .prop_map(|(user, message)| FrameSpec::Chat { user, message }),
        3 => (user_strategy(), prop::sample::select(vec!["connected", "left", "kicked"]), 0u64..10)
            .prop_map(|(user, reason, connections)| FrameSpec::Presence { user, reason, connections }),
        1 => "[a-z]{1,10}( [a-z]{1,10})?".prop_map(FrameSpec::Garbage),
        1 => Just(FrameSpec::Unmatched),
    ]
}

/// Generate random app events.
fn event_strategy() -> impl Strategy<Value = AppEvent> {
    prop_oneof![
        1 => Just(AppEvent::Tick),
        1 => (1u16..200, 1u16..100).prop_map(|(c, r)| AppEvent::Resize(c, r)),
        1 => Just(AppEvent::Connecting),
        2 => Just(AppEvent::Opened),
        1 => Just(AppEvent::Closed),
        1 => "[a-z]{1,8}".prop_map(|message| AppEvent::TransportError { message }),
        4 => (frame_strategy(), 0u64..1000).prop_map(|(spec, secs)| AppEvent::FrameReceived {
            frame: Frame::new(spec.raw()),
            received_at: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        }),
    ]
}

fn app() -> App {
    App::new(Endpoint::new("localhost:1999", "lobby", "alice"), &ReconcilerConfig::default())
}

fn receive(app: &mut App, raw: &str, secs: u64) {
    app.handle(AppEvent::FrameReceived {
        frame: Frame::new(raw),
        received_at: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
    });
}

proptest! {
    #[test]
    fn prop_app_invariants_hold(events in prop::collection::vec(event_strategy(), 0..60)) {
        let mut app = app();
        let invariants = InvariantRegistry::standard();

        for event in events {
            let _ = app.handle(event);
            let snapshot = SessionSnapshot::from_app(&app);
            prop_assert!(invariants.check_all(&snapshot).is_ok(), "{:?}", invariants.check_all(&snapshot));
        }
    }

    #[test]
    fn prop_transcript_holds_chat_frames_in_order(specs in prop::collection::vec(frame_strategy(), 0..60)) {
        let mut app = app();
        for (i, spec) in specs.iter().enumerate() {
            receive(&mut app, &spec.raw(), i as u64);
        }

        let expected: Vec<String> = specs
            .iter()
            .filter_map(|spec| match spec {
                FrameSpec::Chat { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect();
        let actual: Vec<String> = app.transcript().iter().map(|m| m.message.clone()).collect();

        prop_assert_eq!(app.transcript().len(), specs.iter().filter(|s| s.is_chat()).count());
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_latest_presence_is_last_presence_frame(specs in prop::collection::vec(frame_strategy(), 0..40)) {
        let mut app = app();
        for (i, spec) in specs.iter().enumerate() {
            receive(&mut app, &spec.raw(), i as u64);
        }

        let last = specs.iter().rev().find_map(|spec| match spec {
            FrameSpec::Presence { user, reason, connections } => Some((user.clone(), *reason, *connections)),
            _ => None,
        });

        match (last, app.latest_presence()) {
            (None, None) => {},
            (Some((user, reason, connections)), Some(latest)) => {
                prop_assert_eq!(&latest.user, &user);
                prop_assert_eq!(latest.change_reason.as_str(), reason);
                prop_assert_eq!(latest.connections, connections);
            },
            (expected, actual) => prop_assert!(false, "expected {:?}, got {:?}", expected, actual),
        }
    }

    #[test]
    fn prop_connected_then_left_removes_user(user in user_strategy(), repeats in 1usize..4) {
        let mut app = app();
        let connected = json!({ "user": user, "changeReason": "connected", "connections": 1 });
        let left = json!({ "user": user, "changeReason": "left", "connections": 0 });

        for _ in 0..repeats {
            receive(&mut app, &connected.to_string(), 1);
            prop_assert!(app.roster().contains(&user));
            prop_assert_eq!(app.roster().len(), 1);
        }

        receive(&mut app, &left.to_string(), 2);
        prop_assert!(!app.roster().contains(&user));
    }

    #[test]
    fn prop_forged_time_is_replaced(forged in any::<i64>(), secs in 0u64..1_000_000) {
        let mut app = app();
        let raw = json!({ "user": "a", "message": "hi", "time": forged });
        receive(&mut app, &raw.to_string(), secs);

        let entry = app.transcript().last().unwrap();
        prop_assert_eq!(entry.time, SystemTime::UNIX_EPOCH + Duration::from_secs(secs));
        prop_assert!(!entry.extra.contains_key("time"));
    }

    #[test]
    fn prop_error_from_any_state(setup in prop::collection::vec(event_strategy(), 0..20), message in "[a-z]{1,8}") {
        let mut app = app();
        for event in setup {
            let _ = app.handle(event);
        }

        app.handle(AppEvent::TransportError { message: message.clone() });

        prop_assert_eq!(app.connection_state(), &ConnectionState::Error { message });
        prop_assert!(!app.show_live_indicator());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_open_then_close_clears_user_name(setup in prop::collection::vec(event_strategy(), 0..20)) {
        let mut app = app();
        for event in setup {
            let _ = app.handle(event);
        }

        app.handle(AppEvent::Opened);
        prop_assert_eq!(app.connection_state().user_name(), Some("alice"));

        app.handle(AppEvent::Closed);
        prop_assert_eq!(app.connection_state(), &ConnectionState::Disconnected);
        prop_assert_eq!(app.connection_state().user_name(), None);
    }

    #[test]
    fn prop_bounded_presence_history_keeps_newest(count in 0usize..40, limit in 0usize..10) {
        let config = ReconcilerConfig { presence_log_limit: Some(limit), ..Default::default() };
        let mut app = App::new(Endpoint::new("localhost:1999", "lobby", "alice"), &config);

        for i in 0..count {
            let raw = json!({ "user": format!("u{i}"), "changeReason": "connected", "connections": i });
            receive(&mut app, &raw.to_string(), i as u64);
        }

        prop_assert_eq!(app.presence_events().len(), count.min(limit));
        if limit > 0 && count > 0 {
            let newest = app.presence_events().latest().unwrap();
            prop_assert_eq!(&newest.user, &format!("u{}", count - 1));
        }
        prop_assert_eq!(app.roster().len(), count);
        prop_assert!(matches!(
            app.latest_presence().map(|p| &p.change_reason),
            None | Some(ChangeReason::Connected)
        ));
    }
}
