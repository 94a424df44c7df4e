//! Connection lifecycle state machine.
//!
//! Driven by transport lifecycle events, independent of frame content.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────────┐ begin_connect ┌────────────┐   open   ┌───────────┐
//! │ Disconnected │──────────────>│ Connecting │─────────>│ Connected │
//! └──────────────┘               └────────────┘          └───────────┘
//!        ^  ^                                                  │
//!        │  └──────────────────────── close ───────────────────┘
//!        │ close        ┌───────┐
//!        └──────────────│ Error │<── error (from any state)
//!                       └───────┘──── open ──> Connected
//! ```
//!
//! `open` is accepted from every state, so a transport that opens without a
//! preceding `begin_connect` still lands in `Connected`. No reconnect policy
//! lives here.

use crate::ConnectionState;

/// Connection lifecycle controller.
#[derive(Debug, Clone, Default)]
pub struct ConnectionLifecycle {
    state: ConnectionState,
}

impl ConnectionLifecycle {
    /// Create a controller in [`ConnectionState::Disconnected`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// True iff connected.
    pub fn show_live_indicator(&self) -> bool {
        self.state.is_connected()
    }

    /// A connection attempt started.
    ///
    /// Returns `false` and leaves the state alone while connected.
    pub fn begin_connect(&mut self) -> bool {
        if self.state.is_connected() {
            return false;
        }
        self.transition(ConnectionState::Connecting);
        true
    }

    /// Transport opened. Annotates the state with `identity`.
    pub fn on_open(&mut self, identity: &str) {
        self.transition(ConnectionState::Connected { user_name: identity.to_string() });
    }

    /// Transport closed. Clears the identity annotation.
    pub fn on_close(&mut self) {
        self.transition(ConnectionState::Disconnected);
    }

    /// Transport reported an error.
    pub fn on_error(&mut self, message: impl Into<String>) {
        self.transition(ConnectionState::Error { message: message.into() });
    }

    fn transition(&mut self, next: ConnectionState) {
        if self.state != next {
            tracing::info!(from = self.state.label(), to = next.label(), "connection state");
        }
        self.state = next;
    }
}
