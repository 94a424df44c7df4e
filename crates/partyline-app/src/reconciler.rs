//! State reconciliation.
//!
//! The [`Reconciler`] owns the frame-derived projections and merges each
//! classified frame into exactly the projection it targets:
//!
//! | Variant | Projection |
//! |---------|------------|
//! | `Chat` | transcript (append) |
//! | `Presence` | roster, presence history, latest presence |
//! | `Unparseable` | server message log (prepend) |
//!
//! # Invariants
//!
//! - Frames are applied strictly in the order `apply` is called.
//! - Every entry is stamped with the receipt time. Payload fields are applied
//!   first and the stamp last, so a wire `time` can never survive.
//! - Roster mutation is idempotent (set semantics). Transcript append is not:
//!   a duplicated chat frame yields a duplicated entry.
//! - The latest presence event is overwritten by every presence frame,
//!   regardless of reason.

use std::time::SystemTime;

use partyline_proto::{ChangeReason, ChatPayload, Classifier, PresencePayload, Variant};

use crate::{
    ReconcilerConfig,
    state::{BoundedLog, ChatMessage, PresenceEvent, Roster, Transcript},
};

/// Which projection a frame changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// A chat message was appended to the transcript.
    TranscriptAppended,
    /// A presence event was recorded.
    PresenceUpdated {
        /// Roster membership changed.
        roster_changed: bool,
    },
    /// A server message was logged.
    ServerMessageLogged,
}

impl Reconciled {
    /// True if the transcript grew. Consumers scroll to latest on this.
    pub fn transcript_changed(self) -> bool {
        matches!(self, Self::TranscriptAppended)
    }
}

/// Owner of the frame-derived projections.
#[derive(Debug, Clone)]
pub struct Reconciler {
    classifier: Classifier,
    track_roster: bool,
    transcript: Transcript,
    roster: Roster,
    presence_log: BoundedLog<PresenceEvent>,
    latest_presence: Option<PresenceEvent>,
    server_log: BoundedLog<String>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(&ReconcilerConfig::default())
    }
}

impl Reconciler {
    /// Create a reconciler with empty projections.
    pub fn new(config: &ReconcilerConfig) -> Self {
        Self {
            classifier: Classifier::new(config.unmatched),
            track_roster: config.track_roster,
            transcript: Transcript::new(),
            roster: Roster::new(),
            presence_log: BoundedLog::new(config.presence_log_limit),
            latest_presence: None,
            server_log: BoundedLog::new(config.server_log_limit),
        }
    }

    /// Classify raw frame text and apply it.
    ///
    /// Returns `None` if the classifier dropped the frame.
    pub fn ingest(&mut self, raw: &str, received_at: SystemTime) -> Option<Reconciled> {
        let Some(variant) = self.classifier.classify(raw) else {
            tracing::debug!(len = raw.len(), "dropping frame of unknown shape");
            return None;
        };
        Some(self.apply(variant, received_at))
    }

    /// Apply a classified frame.
    pub fn apply(&mut self, variant: Variant, received_at: SystemTime) -> Reconciled {
        match variant {
            Variant::Chat(ChatPayload { user, message, extra }) => {
                tracing::debug!(%user, "chat frame");
                self.transcript.push(ChatMessage { user, message, time: received_at, extra });
                Reconciled::TranscriptAppended
            },
            Variant::Presence(PresencePayload { user, change_reason, connections, extra }) => {
                tracing::debug!(%user, reason = %change_reason, connections, "presence frame");
                let event =
                    PresenceEvent { user, time: received_at, change_reason, connections, extra };
                let roster_changed = self.track_roster && self.update_roster(&event);
                self.presence_log.push(event.clone());
                self.latest_presence = Some(event);
                Reconciled::PresenceUpdated { roster_changed }
            },
            Variant::Unparseable(raw) => {
                tracing::debug!(len = raw.len(), "server message");
                self.server_log.push(raw);
                Reconciled::ServerMessageLogged
            },
        }
    }

    fn update_roster(&mut self, event: &PresenceEvent) -> bool {
        match &event.change_reason {
            ChangeReason::Connected => self.roster.insert(event.user.as_str()),
            ChangeReason::Left => self.roster.remove(&event.user),
            ChangeReason::Other(_) => false,
        }
    }

    /// True if the roster is maintained.
    pub fn tracks_roster(&self) -> bool {
        self.track_roster
    }

    /// Chat transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Users believed present.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Presence events, most recent first.
    pub fn presence_log(&self) -> &BoundedLog<PresenceEvent> {
        &self.presence_log
    }

    /// Most recent presence event. `None` before any arrives.
    pub fn latest_presence(&self) -> Option<&PresenceEvent> {
        self.latest_presence.as_ref()
    }

    /// Server messages, most recent first.
    pub fn server_log(&self) -> &BoundedLog<String> {
        &self.server_log
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use partyline_proto::UnmatchedPolicy;

    use super::*;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn chat_appends_with_receipt_time() {
        let mut reconciler = Reconciler::default();
        let result = reconciler.ingest(r#"{"user":"a","message":"hi","time":0}"#, at(100));

        assert_eq!(result, Some(Reconciled::TranscriptAppended));
        let message = reconciler.transcript().last().unwrap();
        assert_eq!(message.user, "a");
        assert_eq!(message.message, "hi");
        assert_eq!(message.time, at(100));
    }

    #[test]
    fn presence_scenario() {
        let mut reconciler = Reconciler::default();
        reconciler.ingest(r#"{"user":"a","changeReason":"connected","connections":1}"#, at(1));
        reconciler.ingest(r#"{"user":"b","changeReason":"connected","connections":2}"#, at(2));
        reconciler.ingest(r#"{"user":"a","changeReason":"left","connections":1}"#, at(3));

        assert_eq!(reconciler.roster().iter().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(reconciler.latest_presence().map(|p| p.connections), Some(1));
        assert_eq!(reconciler.presence_log().len(), 3);
        assert_eq!(reconciler.presence_log().latest().map(|p| p.user.as_str()), Some("a"));
    }

    #[test]
    fn duplicate_connected_is_idempotent() {
        let mut reconciler = Reconciler::default();
        let frame = r#"{"user":"a","changeReason":"connected","connections":1}"#;

        assert_eq!(
            reconciler.ingest(frame, at(1)),
            Some(Reconciled::PresenceUpdated { roster_changed: true })
        );
        assert_eq!(
            reconciler.ingest(frame, at(2)),
            Some(Reconciled::PresenceUpdated { roster_changed: false })
        );
        assert_eq!(reconciler.roster().len(), 1);
    }

    #[test]
    fn other_reason_updates_latest_only() {
        let mut reconciler = Reconciler::default();
        reconciler.ingest(r#"{"user":"a","changeReason":"renamed","connections":4}"#, at(1));

        assert!(reconciler.roster().is_empty());
        assert_eq!(reconciler.latest_presence().map(|p| p.connections), Some(4));
    }

    #[test]
    fn not_json_goes_to_server_log() {
        let mut reconciler = Reconciler::default();
        reconciler.ingest("not json", at(1));

        assert_eq!(reconciler.server_log().iter().collect::<Vec<_>>(), vec!["not json"]);
        assert!(reconciler.transcript().is_empty());
        assert!(reconciler.roster().is_empty());
    }

    #[test]
    fn server_log_is_most_recent_first() {
        let mut reconciler = Reconciler::default();
        reconciler.ingest("first", at(1));
        reconciler.ingest("second", at(2));

        assert_eq!(reconciler.server_log().iter().collect::<Vec<_>>(), vec!["second", "first"]);
    }

    #[test]
    fn drop_policy_discards_unmatched() {
        let config = ReconcilerConfig { unmatched: UnmatchedPolicy::Drop, ..Default::default() };
        let mut reconciler = Reconciler::new(&config);

        assert_eq!(reconciler.ingest(r#"{"kind":"sync"}"#, at(1)), None);
        assert!(reconciler.server_log().is_empty());
    }

    #[test]
    fn roster_tracking_can_be_disabled() {
        let config = ReconcilerConfig { track_roster: false, ..Default::default() };
        let mut reconciler = Reconciler::new(&config);
        reconciler.ingest(r#"{"user":"a","changeReason":"connected","connections":1}"#, at(1));

        assert!(reconciler.roster().is_empty());
        assert_eq!(reconciler.latest_presence().map(|p| p.user.as_str()), Some("a"));
    }

    #[test]
    fn duplicate_chat_frames_duplicate_entries() {
        let mut reconciler = Reconciler::default();
        let frame = r#"{"user":"a","message":"hi"}"#;
        reconciler.ingest(frame, at(1));
        reconciler.ingest(frame, at(1));

        assert_eq!(reconciler.transcript().len(), 2);
    }
}
