//! Wire protocol for partyline rooms.
//!
//! A room speaks newline-free text frames over a persistent socket. Most
//! frames are JSON objects in one of two shapes, a chat line or a presence
//! change, and anything else is a free-form server announcement.
//!
//! # Components
//!
//! - [`Frame`]: One inbound text unit as delivered by the transport
//! - [`TransportEvent`]: Socket lifecycle callbacks as values
//! - [`Payload`]: Decoded chat and presence payloads
//! - [`Classifier`]: Pure frame classification into [`Variant`]s
//! - [`Endpoint`]: Room socket address (host, room, identity)
//!
//! # Invariants
//!
//! Classification never fails and never panics: every input string maps to
//! exactly one [`Variant`] (or to nothing under [`UnmatchedPolicy::Drop`]).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod classify;
mod endpoint;
pub mod errors;
mod frame;
pub mod payloads;

pub use classify::{Classifier, UnmatchedPolicy, Variant, classify};
pub use endpoint::{DEFAULT_HOST, DEFAULT_ROOM, Endpoint};
pub use errors::ProtocolError;
pub use frame::{Frame, TransportEvent};
pub use payloads::{ChangeReason, ChatPayload, Payload, PresencePayload};
