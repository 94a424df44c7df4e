//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of a session at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use std::collections::BTreeSet;

use partyline_app::{App, ConnectionState};
use partyline_proto::ChangeReason;

/// One presence event as the snapshot records it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRecord {
    /// User whose membership changed.
    pub user: String,
    /// Why it changed.
    pub change_reason: ChangeReason,
    /// Occupancy reported with the change.
    pub connections: u64,
}

/// Snapshot of one session's observable state.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Identity presented to the room.
    pub identity: String,
    /// Connection state.
    pub connection: ConnectionState,
    /// Whether the live indicator is shown.
    pub live_indicator: bool,
    /// Users believed present.
    pub roster: BTreeSet<String>,
    /// Whether the roster is maintained at all.
    pub tracks_roster: bool,
    /// Presence events, oldest first.
    pub presence_history: Vec<PresenceRecord>,
    /// True if older presence events may have been evicted from the history.
    pub history_truncated: bool,
    /// Most recent presence event.
    pub latest_presence: Option<PresenceRecord>,
    /// Transcript length.
    pub transcript_len: usize,
    /// Server message count.
    pub server_message_count: usize,
}

impl SessionSnapshot {
    /// Create an empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the observable state of `app`.
    pub fn from_app(app: &App) -> Self {
        let record = |event: &partyline_app::PresenceEvent| PresenceRecord {
            user: event.user.clone(),
            change_reason: event.change_reason.clone(),
            connections: event.connections,
        };

        let presence = app.presence_events();
        let history_truncated = presence.limit().is_some_and(|limit| presence.len() >= limit);

        Self {
            identity: app.identity().to_string(),
            connection: app.connection_state().clone(),
            live_indicator: app.show_live_indicator(),
            roster: app.roster().iter().cloned().collect(),
            tracks_roster: app.reconciler().tracks_roster(),
            presence_history: presence.iter().rev().map(record).collect(),
            history_truncated,
            latest_presence: app.latest_presence().map(record),
            transcript_len: app.transcript().len(),
            server_message_count: app.server_messages().len(),
        }
    }

    /// Replay the presence history into the roster it implies.
    pub fn replay_roster(&self) -> BTreeSet<String> {
        let mut roster = BTreeSet::new();
        for record in &self.presence_history {
            match record.change_reason {
                ChangeReason::Connected => {
                    roster.insert(record.user.clone());
                },
                ChangeReason::Left => {
                    roster.remove(&record.user);
                },
                ChangeReason::Other(_) => {},
            }
        }
        roster
    }
}
