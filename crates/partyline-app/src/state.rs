//! Observable client state.
//!
//! This module defines the projections the client derives from the frame
//! stream: the chat [`Transcript`], the presence [`Roster`], bounded logs for
//! server messages and presence history, and the [`ConnectionState`].
//!
//! These structures are the "View Model" for presentation. Presentation reads
//! them through shared references and never mutates them.

use std::{
    collections::{BTreeSet, VecDeque, btree_set, vec_deque},
    time::SystemTime,
};

use partyline_proto::ChangeReason;
use serde_json::{Map, Value};

/// Connection state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not connected.
    #[default]
    Disconnected,
    /// Connection in progress.
    Connecting,
    /// Socket open.
    Connected {
        /// Identity the session connected as.
        user_name: String,
    },
    /// Transport reported an error. Not terminal.
    Error {
        /// Error description.
        message: String,
    },
}

impl ConnectionState {
    /// Identity annotation. `None` unless connected.
    pub fn user_name(&self) -> Option<&str> {
        match self {
            Self::Connected { user_name } => Some(user_name),
            Self::Disconnected | Self::Connecting | Self::Error { .. } => None,
        }
    }

    /// True iff connected.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::Connected { .. } => "Connected",
            Self::Error { .. } => "Error",
        }
    }
}

/// One transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Author.
    pub user: String,
    /// Message text.
    pub message: String,
    /// Receipt time.
    pub time: SystemTime,
    /// Wire fields the client does not model.
    pub extra: Map<String, Value>,
}

/// One room membership change plus occupancy as of that change.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceEvent {
    /// User whose membership changed.
    pub user: String,
    /// Receipt time.
    pub time: SystemTime,
    /// Why it changed.
    pub change_reason: ChangeReason,
    /// Room occupancy as of this event.
    pub connections: u64,
    /// Wire fields the client does not model.
    pub extra: Map<String, Value>,
}

/// Chat history for the session.
///
/// Append-only: insertion order is arrival order, and entries are never
/// reordered, edited or removed.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Messages in arrival order.
    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Iterate in arrival order.
    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }

    /// Most recent message.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if no message has arrived.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Users the client believes are present.
///
/// Derived from observed presence events only. A client that joins mid-session
/// does not learn earlier occupants, so the roster can be incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    users: BTreeSet<String>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user. Returns `false` if already present.
    pub fn insert(&mut self, user: impl Into<String>) -> bool {
        self.users.insert(user.into())
    }

    /// Remove a user. Returns `false` if absent.
    pub fn remove(&mut self, user: &str) -> bool {
        self.users.remove(user)
    }

    /// True if `user` is present.
    pub fn contains(&self, user: &str) -> bool {
        self.users.contains(user)
    }

    /// Users in lexical order.
    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.users.iter()
    }

    /// Number of users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// True if nobody is known to be present.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Most-recent-first log with an optional capacity.
///
/// When full, pushing evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
    limit: Option<usize>,
}

impl<T> BoundedLog<T> {
    /// Create a log. `None` means unbounded.
    pub fn new(limit: Option<usize>) -> Self {
        Self { entries: VecDeque::new(), limit }
    }

    /// Prepend an entry.
    pub fn push(&mut self, entry: T) {
        if self.limit == Some(0) {
            return;
        }
        self.entries.push_front(entry);
        if let Some(limit) = self.limit {
            self.entries.truncate(limit);
        }
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// Iterate most recent first.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.entries.iter()
    }

    /// Capacity. `None` if unbounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a BoundedLog<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
