//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - Terminal notifications (Resize) and system ticks.
//! - Transport lifecycle callbacks translated by the runtime.

use std::time::SystemTime;

use partyline_proto::Frame;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Connection in progress.
    Connecting,

    /// Socket opened.
    Opened,

    /// Frame received.
    FrameReceived {
        /// Raw frame.
        frame: Frame,
        /// Receipt time. Becomes the timestamp of whatever the frame creates.
        received_at: SystemTime,
    },

    /// Socket closed.
    Closed,

    /// Transport reported an error.
    TransportError {
        /// Error description.
        message: String,
    },
}
