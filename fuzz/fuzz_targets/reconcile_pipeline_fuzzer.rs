//! Fuzz target for the receive pipeline (classify → reconcile → project)
//!
//! # Strategy
//!
//! - Raw frames: arbitrary text through the full App pipeline
//! - Shaped frames: chat and presence frames with fuzzed fields
//! - Lifecycle: open, close and error events interleaved with frames
//!
//! # Invariants
//!
//! - The pipeline never panics
//! - Transcript length equals the number of chat frames applied
//! - Latest presence always equals the newest presence history entry
//! - Live indicator shown iff connected

#![no_main]

use std::time::{Duration, SystemTime};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use partyline_app::{App, AppEvent, ReconcilerConfig};
use partyline_proto::{
    ChangeReason, ChatPayload, Endpoint, Frame, Payload, PresencePayload, UnmatchedPolicy,
};

#[derive(Debug, Clone, Arbitrary)]
struct Scenario {
    drop_unmatched: bool,
    track_roster: bool,
    presence_limit: Option<u8>,
    steps: Vec<Step>,
}

#[derive(Debug, Clone, Arbitrary)]
enum Step {
    Raw(String),
    Chat { user: String, message: String },
    Presence { user: String, reason: Reason, connections: u64 },
    Open,
    Close,
    Error(String),
}

#[derive(Debug, Clone, Arbitrary)]
enum Reason {
    Connected,
    Left,
    Other(String),
}

impl From<Reason> for ChangeReason {
    fn from(reason: Reason) -> Self {
        match reason {
            Reason::Connected => Self::Connected,
            Reason::Left => Self::Left,
            Reason::Other(text) => Self::from_wire(&text),
        }
    }
}

fuzz_target!(|scenario: Scenario| {
    let unmatched =
        if scenario.drop_unmatched { UnmatchedPolicy::Drop } else { UnmatchedPolicy::SystemMessage };
    let config = ReconcilerConfig {
        unmatched,
        track_roster: scenario.track_roster,
        server_log_limit: Some(64),
        presence_log_limit: scenario.presence_limit.map(usize::from),
    };
    let mut app = App::new(Endpoint::new("localhost:1999", "fuzz", "fuzzer"), &config);
    let mut chats = 0usize;

    for (i, step) in scenario.steps.into_iter().enumerate() {
        let received_at = SystemTime::UNIX_EPOCH + Duration::from_secs(i as u64);
        let event = match step {
            Step::Raw(raw) => {
                if matches!(Payload::decode(&raw), Ok(Payload::Chat(_))) {
                    chats += 1;
                }
                AppEvent::FrameReceived { frame: Frame::new(raw), received_at }
            },
            Step::Chat { user, message } => {
                let Ok(raw) = Payload::Chat(ChatPayload::new(user, message)).encode() else {
                    continue;
                };
                chats += 1;
                AppEvent::FrameReceived { frame: Frame::new(raw), received_at }
            },
            Step::Presence { user, reason, connections } => {
                let payload = PresencePayload::new(user, reason.into(), connections);
                let Ok(raw) = Payload::Presence(payload).encode() else {
                    continue;
                };
                AppEvent::FrameReceived { frame: Frame::new(raw), received_at }
            },
            Step::Open => AppEvent::Opened,
            Step::Close => AppEvent::Closed,
            Step::Error(message) => AppEvent::TransportError { message },
        };

        let _ = app.handle(event);

        assert_eq!(app.transcript().len(), chats);
        assert_eq!(app.show_live_indicator(), app.connection_state().is_connected());
        if let Some(newest) = app.presence_events().latest() {
            assert_eq!(Some(newest), app.latest_presence());
        }
    }
});
