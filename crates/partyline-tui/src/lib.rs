//! Terminal UI for Partyline
//!
//! A thin shell over [`partyline_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`partyline_app::Runtime`]
//!
//! This crate only handles terminal input and rendering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod input;
pub mod terminal;
pub mod ui;

pub use input::{InputState, KeyInput};
pub use partyline_app::{App, AppAction, AppEvent, Driver, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
