//! Session invariants.
//!
//! A session is reduced to a [`SessionSnapshot`] of what a user could
//! observe, and every registered [`Invariant`] judges that snapshot. The
//! [`crate::SimDriver`] does this after each render, so a property test
//! exercises the checks on every intermediate state rather than only at the
//! end of a scenario.

mod checks;
mod snapshot;

pub use checks::{
    LatestPresenceIsNewest, LiveIndicatorMatchesState, RosterMatchesHistory,
    UserNameOnlyWhenConnected,
};
pub use snapshot::{PresenceRecord, SessionSnapshot};
use thiserror::Error;

/// Outcome of a single check.
pub type InvariantResult = Result<(), Violation>;

/// A failed check.
#[derive(Debug, Clone, Error)]
#[error("{invariant}: {message}")]
pub struct Violation {
    /// Check that failed.
    pub invariant: &'static str,
    /// What the snapshot showed.
    pub message: String,
}

/// A property of an observable session.
pub trait Invariant: Send + Sync {
    /// Short name used in violation reports.
    fn name(&self) -> &'static str;

    /// Judge `state`.
    fn check(&self, state: &SessionSnapshot) -> InvariantResult;
}

/// Ordered set of checks run together.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry with no checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// The four session checks:
    ///
    /// - [`RosterMatchesHistory`]
    /// - [`LatestPresenceIsNewest`]
    /// - [`LiveIndicatorMatchesState`]
    /// - [`UserNameOnlyWhenConnected`]
    pub fn standard() -> Self {
        Self::new()
            .with(RosterMatchesHistory)
            .with(LatestPresenceIsNewest)
            .with(LiveIndicatorMatchesState)
            .with(UserNameOnlyWhenConnected)
    }

    /// Append a check.
    #[must_use]
    pub fn with<I: Invariant + 'static>(mut self, invariant: I) -> Self {
        self.invariants.push(Box::new(invariant));
        self
    }

    /// Run every check, collecting all failures.
    pub fn check_all(&self, state: &SessionSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Number of checks.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// True if there are no checks.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
