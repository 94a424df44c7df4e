//! Deterministic simulation harness for partyline session testing.
//!
//! In-process implementations of the room broker and the [`Driver`] trait for
//! deterministic, reproducible testing of the session runtime.
//!
//! # Simulation
//!
//! [`SimRoom`] produces frames shaped exactly like the broker's broadcasts.
//! [`SimDriver`] feeds them, together with scripted user intents and a manual
//! clock, through the same [`partyline_app::Runtime`] that runs in production.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the session
//! invariants.
//!
//! [`Driver`]: partyline_app::Driver

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_room;

pub use invariants::{
    Invariant, InvariantRegistry, InvariantResult, LatestPresenceIsNewest,
    LiveIndicatorMatchesState, PresenceRecord, RosterMatchesHistory, SessionSnapshot,
    UserNameOnlyWhenConnected, Violation,
};
pub use sim_driver::{SimDriver, SimDriverError, UserIntent};
pub use sim_room::SimRoom;
