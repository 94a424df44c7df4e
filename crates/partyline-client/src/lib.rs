//! Client
//!
//! WebSocket transport for partyline rooms. Opens the room socket, forwards
//! outbound text verbatim, and reports inbound frames and socket lifecycle as
//! [`TransportEvent`] values.
//!
//! # Architecture
//!
//! The transport is a thin layer that only moves text. Classification and
//! state reconciliation stay in the Sans-IO `partyline-app` crate, which
//! consumes the events this crate produces.
//!
//! # Components
//!
//! - [`transport::connect`]: Open a room socket
//! - [`transport::ConnectedClient`]: Channels to and from the socket task
//! - [`TransportConfig`]: Timeouts and buffer sizes

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
pub mod transport;

pub use error::TransportError;
pub use partyline_proto::TransportEvent;
pub use transport::{ConnectedClient, TransportConfig, connect};
