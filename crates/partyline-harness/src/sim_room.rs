//! In-process room broker.
//!
//! [`SimRoom`] reproduces what a client observes from a live room: presence
//! broadcasts on join and leave carrying the occupancy count, chat broadcasts
//! carrying the author, and plain-text system lines. Frames go to a broadcast
//! queue that tests drain into a driver.

use std::collections::{BTreeMap, VecDeque};

use partyline_proto::Frame;
use serde_json::json;

/// Simulated room.
///
/// Tracks connection counts per user, so the same user may hold several
/// connections. `connections` on every presence frame is the room total after
/// the change, as the broker reports it.
#[derive(Debug, Clone, Default)]
pub struct SimRoom {
    connections: BTreeMap<String, u64>,
    broadcast: VecDeque<Frame>,
}

impl SimRoom {
    /// Create an empty room.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a connection for `user` and broadcast `connected`.
    pub fn join(&mut self, user: &str) -> Frame {
        *self.connections.entry(user.to_string()).or_default() += 1;
        self.presence(user, "connected")
    }

    /// Close one connection of `user` and broadcast `left`.
    ///
    /// Unknown users still produce a frame, matching a broker that forwards
    /// whatever its connection hooks report.
    pub fn leave(&mut self, user: &str) -> Frame {
        if let Some(count) = self.connections.get_mut(user) {
            *count -= 1;
            if *count == 0 {
                self.connections.remove(user);
            }
        }
        self.presence(user, "left")
    }

    /// Broadcast a chat message from `user`.
    pub fn say(&mut self, user: &str, text: &str) -> Frame {
        self.emit(json!({ "user": user, "message": text }).to_string())
    }

    /// Broadcast a plain-text system line.
    pub fn announce(&mut self, text: &str) -> Frame {
        self.emit(text.to_string())
    }

    /// Broadcast an arbitrary frame.
    pub fn broadcast_raw(&mut self, data: impl Into<String>) -> Frame {
        self.emit(data.into())
    }

    /// Total open connections.
    pub fn occupancy(&self) -> u64 {
        self.connections.values().sum()
    }

    /// True if `user` holds at least one connection.
    pub fn is_present(&self, user: &str) -> bool {
        self.connections.contains_key(user)
    }

    /// Take all frames broadcast so far, oldest first.
    pub fn drain(&mut self) -> Vec<Frame> {
        self.broadcast.drain(..).collect()
    }

    fn presence(&mut self, user: &str, reason: &str) -> Frame {
        let frame = json!({
            "user": user,
            "changeReason": reason,
            "connections": self.occupancy(),
        });
        self.emit(frame.to_string())
    }

    fn emit(&mut self, data: String) -> Frame {
        let frame = Frame::new(data);
        self.broadcast.push_back(frame.clone());
        frame
    }
}
