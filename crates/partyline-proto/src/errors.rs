//! Error types for frame decoding.

use thiserror::Error;

/// Convenience alias for decode results.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Reasons a frame could not be decoded into a [`crate::Payload`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame is not valid JSON.
    #[error("invalid json: {0}")]
    InvalidJson(String),

    /// Frame is valid JSON but not an object.
    #[error("expected a json object, got {kind}")]
    NotAnObject {
        /// JSON kind that was found instead.
        kind: &'static str,
    },

    /// Object carries neither `changeReason` nor `message`.
    #[error("object has neither `changeReason` nor `message`")]
    MissingDiscriminator,
}

impl ProtocolError {
    /// Returns true if the frame was structured data of an unknown shape.
    ///
    /// Shape mismatches are subject to [`crate::UnmatchedPolicy`]; invalid
    /// JSON is always surfaced as a server message.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::NotAnObject { .. } | Self::MissingDiscriminator)
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson(err.to_string())
    }
}
