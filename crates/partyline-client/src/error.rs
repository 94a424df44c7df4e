//! Transport errors.

use std::time::Duration;

use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint does not form a valid socket request.
    #[error("invalid endpoint {url}: {reason}")]
    InvalidEndpoint {
        /// Socket URL that was rejected.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The handshake did not complete in time.
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),

    /// The socket task has exited.
    #[error("connection closed")]
    ChannelClosed,
}
