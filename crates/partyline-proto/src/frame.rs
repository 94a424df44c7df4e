//! Inbound frames and transport lifecycle events.

use std::fmt;

/// One discrete inbound unit of data delivered by the transport.
///
/// Frames are opaque text until classified. No validation happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: String,
}

impl Frame {
    /// Wrap raw frame text.
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// Raw frame text.
    pub fn data(&self) -> &str {
        &self.data
    }
}

impl From<String> for Frame {
    fn from(data: String) -> Self {
        Self { data }
    }
}

impl From<&str> for Frame {
    fn from(data: &str) -> Self {
        Self::new(data)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data)
    }
}

/// Socket lifecycle callbacks, as values.
///
/// The transport guarantees ordered delivery per connection: for one socket,
/// `Open` precedes every `Message`, and `Close` is the last event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Socket opened.
    Open,
    /// Frame received.
    Message(Frame),
    /// Socket closed.
    Close,
    /// Socket reported an error.
    Error {
        /// Error description.
        message: String,
    },
}
