//! Reconciler configuration.

use partyline_proto::UnmatchedPolicy;

/// Default capacity of the rolling presence-event list.
pub const DEFAULT_PRESENCE_LOG_LIMIT: usize = 100;

/// Configuration for [`crate::Reconciler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// What to do with structured frames of unknown shape.
    pub unmatched: UnmatchedPolicy,
    /// Maintain the roster from presence events. When `false` only the
    /// latest presence event and the presence history are kept.
    pub track_roster: bool,
    /// Server message log capacity. `None` is unbounded.
    pub server_log_limit: Option<usize>,
    /// Presence history capacity. `None` is unbounded.
    pub presence_log_limit: Option<usize>,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            unmatched: UnmatchedPolicy::default(),
            track_roster: true,
            server_log_limit: None,
            presence_log_limit: Some(DEFAULT_PRESENCE_LOG_LIMIT),
        }
    }
}
