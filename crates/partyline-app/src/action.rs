//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use partyline_proto::Endpoint;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// The transcript grew; show its newest entry.
    ScrollToLatest,

    /// Quit the application.
    Quit,

    /// Open the room socket.
    Connect {
        /// Room endpoint.
        endpoint: Endpoint,
    },

    /// Close the room socket.
    Disconnect,

    /// Send text into the room. Fire-and-forget.
    Send {
        /// Raw text, put on the wire as-is.
        text: String,
    },
}
