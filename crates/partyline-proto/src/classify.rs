//! Frame classification.
//!
//! Classification is the first step for every inbound frame and runs before
//! any state is touched. It is pure: the same input always yields the same
//! [`Variant`].
//!
//! Two behaviours exist for structured frames that match neither shape.
//! Logging them as server messages keeps every frame visible; dropping them
//! keeps the server log limited to announcements. [`UnmatchedPolicy`] selects
//! one. Text that is not JSON at all is always a server message.

use crate::{ChatPayload, Payload, PresencePayload};

/// Classified inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    /// Chat line for the transcript.
    Chat(ChatPayload),
    /// Presence change for the roster.
    Presence(PresencePayload),
    /// Anything else, surfaced as a free-form server message.
    Unparseable(String),
}

impl Variant {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Chat(_) => "chat",
            Self::Presence(_) => "presence",
            Self::Unparseable(_) => "unparseable",
        }
    }
}

impl From<Payload> for Variant {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Chat(chat) => Self::Chat(chat),
            Payload::Presence(presence) => Self::Presence(presence),
        }
    }
}

/// What to do with valid JSON that matches neither frame shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedPolicy {
    /// Surface the raw frame as a server message.
    #[default]
    SystemMessage,
    /// Discard the frame.
    Drop,
}

/// Frame classifier with a fixed [`UnmatchedPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classifier {
    policy: UnmatchedPolicy,
}

impl Classifier {
    /// Create a classifier with the given policy.
    pub fn new(policy: UnmatchedPolicy) -> Self {
        Self { policy }
    }

    /// Policy for unmatched structured frames.
    pub fn policy(&self) -> UnmatchedPolicy {
        self.policy
    }

    /// Classify raw frame text.
    ///
    /// Returns `None` only for a shape mismatch under [`UnmatchedPolicy::Drop`].
    pub fn classify(&self, raw: &str) -> Option<Variant> {
        match Payload::decode(raw) {
            Ok(payload) => Some(payload.into()),
            Err(err) if err.is_shape_mismatch() => match self.policy {
                UnmatchedPolicy::SystemMessage => Some(Variant::Unparseable(raw.to_string())),
                UnmatchedPolicy::Drop => None,
            },
            Err(_) => Some(Variant::Unparseable(raw.to_string())),
        }
    }
}

/// Classify raw frame text, logging unmatched shapes as server messages.
pub fn classify(raw: &str) -> Variant {
    Payload::decode(raw).map_or_else(|_| Variant::Unparseable(raw.to_string()), Variant::from)
}
