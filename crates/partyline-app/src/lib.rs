//! Application layer for Partyline
//!
//! Pure state machines and a generic runtime that reconcile a room's frame
//! stream into client-side state, enabling deterministic simulation testing
//! with the same code that runs in production.
//!
//! # Components
//!
//! - [`Reconciler`]: merges classified frames into transcript, roster and
//!   presence projections
//! - [`ConnectionLifecycle`]: connection state transitions
//! - [`App`]: session state machine (transport events in, actions out)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod config;
mod connection;
mod driver;
mod error;
mod event;
mod reconciler;
mod runtime;
pub mod state;

pub use action::AppAction;
pub use app::App;
pub use config::{DEFAULT_PRESENCE_LOG_LIMIT, ReconcilerConfig};
pub use connection::ConnectionLifecycle;
pub use driver::Driver;
pub use error::AppError;
pub use event::AppEvent;
pub use reconciler::{Reconciled, Reconciler};
pub use runtime::{MAX_EVENTS_PER_CYCLE, Runtime};
pub use state::{ChatMessage, ConnectionState, PresenceEvent};
