//! JSON payloads carried by room frames.
//!
//! Payloads are field-tested, not schema-validated: the discriminator field
//! decides the shape and the remaining fields are extracted leniently. Fields
//! the client does not model are kept in `extra` so nothing the server sent is
//! lost.
//!
//! # Invariants
//!
//! - `changeReason` takes precedence over `message` when both are present.
//! - An inbound `time` field is always discarded. Timestamps are stamped by
//!   the receiver and never trusted from the wire.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::{ProtocolError, Result};

/// Discriminator field for presence frames.
pub const CHANGE_REASON_FIELD: &str = "changeReason";

/// Discriminator field for chat frames.
pub const MESSAGE_FIELD: &str = "message";

const USER_FIELD: &str = "user";
const CONNECTIONS_FIELD: &str = "connections";
const TIME_FIELD: &str = "time";

/// Why room membership changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeReason {
    /// User joined the room.
    Connected,
    /// User left the room.
    Left,
    /// Any other reason, preserved verbatim.
    Other(String),
}

impl ChangeReason {
    /// Parse a wire reason string.
    pub fn from_wire(reason: &str) -> Self {
        match reason {
            "connected" => Self::Connected,
            "left" => Self::Left,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Connected => "connected",
            Self::Left => "left",
            Self::Other(reason) => reason,
        }
    }
}

impl fmt::Display for ChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChangeReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A chat line: `{ user, message, ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatPayload {
    /// Author.
    pub user: String,
    /// Message text.
    pub message: String,
    /// Remaining wire fields, minus `time`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatPayload {
    /// Create a chat payload with no extra fields.
    pub fn new(user: impl Into<String>, message: impl Into<String>) -> Self {
        Self { user: user.into(), message: message.into(), extra: Map::new() }
    }
}

/// A presence change: `{ user, changeReason, connections, ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresencePayload {
    /// User whose membership changed.
    pub user: String,
    /// Why it changed.
    #[serde(rename = "changeReason")]
    pub change_reason: ChangeReason,
    /// Room occupancy as of this change.
    pub connections: u64,
    /// Remaining wire fields, minus `time`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PresencePayload {
    /// Create a presence payload with no extra fields.
    pub fn new(user: impl Into<String>, change_reason: ChangeReason, connections: u64) -> Self {
        Self { user: user.into(), change_reason, connections, extra: Map::new() }
    }
}

/// A decoded structured frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Chat line.
    Chat(ChatPayload),
    /// Presence change.
    Presence(PresencePayload),
}

impl Payload {
    /// Decode raw frame text.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::InvalidJson`] if `raw` is not JSON
    /// - [`ProtocolError::NotAnObject`] if `raw` is JSON but not an object
    /// - [`ProtocolError::MissingDiscriminator`] if neither shape matches
    pub fn decode(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => return Err(ProtocolError::NotAnObject { kind: json_kind(&other) }),
        };

        fields.remove(TIME_FIELD);

        if let Some(reason) = fields.remove(CHANGE_REASON_FIELD) {
            let change_reason = match reason {
                Value::String(reason) => ChangeReason::from_wire(&reason),
                other => ChangeReason::Other(other.to_string()),
            };
            let user = take_text(&mut fields, USER_FIELD);
            let connections = fields.remove(CONNECTIONS_FIELD).map_or(0, |v| occupancy(&v));
            return Ok(Self::Presence(PresencePayload {
                user,
                change_reason,
                connections,
                extra: fields,
            }));
        }

        if fields.contains_key(MESSAGE_FIELD) {
            let message = take_text(&mut fields, MESSAGE_FIELD);
            let user = take_text(&mut fields, USER_FIELD);
            return Ok(Self::Chat(ChatPayload { user, message, extra: fields }));
        }

        Err(ProtocolError::MissingDiscriminator)
    }

    /// Encode as wire JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if an `extra` value cannot be serialized.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Remove a field and render it as text. Missing and `null` become empty.
fn take_text(fields: &mut Map<String, Value>, key: &str) -> String {
    match fields.remove(key) {
        Some(Value::String(text)) => text,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Interpret a JSON value as a non-negative occupancy count.
fn occupancy(value: &Value) -> u64 {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|n| n.is_finite() && *n >= 0.0).map(|n| n as u64))
        .unwrap_or(0)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
