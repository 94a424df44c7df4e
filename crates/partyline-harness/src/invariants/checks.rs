//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use super::{Invariant, InvariantResult, SessionSnapshot, Violation};

/// The roster equals a replay of the presence history.
///
/// Connected inserts, left removes, anything else leaves membership alone.
/// Skipped when the roster is disabled or the history has been truncated,
/// since the replay would start from the wrong base.
pub struct RosterMatchesHistory;

impl Invariant for RosterMatchesHistory {
    fn name(&self) -> &'static str {
        "roster_matches_history"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if !state.tracks_roster {
            if !state.roster.is_empty() {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("roster disabled but holds {:?}", state.roster),
                });
            }
            return Ok(());
        }
        if state.history_truncated {
            return Ok(());
        }

        let expected = state.replay_roster();
        if expected != state.roster {
            return Err(Violation {
                invariant: self.name(),
                message: format!("roster {:?} != replayed {:?}", state.roster, expected),
            });
        }
        Ok(())
    }
}

/// The latest presence event is the newest entry of the presence history.
pub struct LatestPresenceIsNewest;

impl Invariant for LatestPresenceIsNewest {
    fn name(&self) -> &'static str {
        "latest_presence_is_newest"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let newest = state.presence_history.last();
        match (&state.latest_presence, newest) {
            (None, None) => Ok(()),
            // A zero-capacity history keeps nothing but the latest event still updates
            (Some(_), None) if state.history_truncated => Ok(()),
            (latest, newest) if latest.as_ref() == newest => Ok(()),
            (latest, newest) => Err(Violation {
                invariant: self.name(),
                message: format!("latest {latest:?} but history head {newest:?}"),
            }),
        }
    }
}

/// The live indicator is shown exactly when connected.
pub struct LiveIndicatorMatchesState;

impl Invariant for LiveIndicatorMatchesState {
    fn name(&self) -> &'static str {
        "live_indicator_matches_state"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.live_indicator != state.connection.is_connected() {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "live indicator {} in state {:?}",
                    state.live_indicator, state.connection
                ),
            });
        }
        Ok(())
    }
}

/// A user name is present exactly when connected, and it is the session
/// identity.
pub struct UserNameOnlyWhenConnected;

impl Invariant for UserNameOnlyWhenConnected {
    fn name(&self) -> &'static str {
        "user_name_only_when_connected"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let connected = state.connection.is_connected();
        match state.connection.user_name() {
            Some(name) if name != state.identity => Err(Violation {
                invariant: self.name(),
                message: format!("user name {name:?} != identity {:?}", state.identity),
            }),
            Some(_) if connected => Ok(()),
            None if !connected => Ok(()),
            _ => Err(Violation {
                invariant: self.name(),
                message: format!("user name presence disagrees with {:?}", state.connection),
            }),
        }
    }
}
