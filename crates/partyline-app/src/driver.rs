//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, time::SystemTime};

use partyline_proto::{Endpoint, TransportEvent};

use crate::{App, AppAction};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in production TUI and simulation.
///
/// # Implementations
///
/// - **TUI**: Uses crossterm for terminal events, tungstenite for the socket
/// - **Simulation**: Scripted intents and frames with a manual clock
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for user input and translate it into actions.
    ///
    /// Implementations may mutate `app` directly for UI-local state (such as
    /// the status line) and return the actions the input produced. An empty
    /// list means nothing happened before the poll interval elapsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input source fails.
    fn poll_event(
        &mut self,
        app: &mut App,
    ) -> impl Future<Output = Result<Vec<AppAction>, Self::Error>> + Send;

    /// Send text to the room.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no open connection or the send fails.
    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Next transport event that is ready.
    ///
    /// Returns `None` if nothing is buffered. Never waits for the network.
    fn recv_event(&mut self) -> impl Future<Output = Option<TransportEvent>> + Send;

    /// Open a socket to the room.
    ///
    /// Returns as soon as the attempt is underway, without waiting for the
    /// handshake. The transport reports [`TransportEvent::Open`] once the
    /// socket is usable, or an error followed by a close if it never is.
    ///
    /// # Errors
    ///
    /// Returns an error if the attempt cannot be started.
    fn connect(&mut self, endpoint: &Endpoint)
    -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Close the socket, if any.
    fn disconnect(&mut self);

    /// Check if a socket is held.
    fn is_connected(&self) -> bool;

    /// Current wall-clock time. Stamps received frames.
    fn now(&self) -> SystemTime;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Bring the newest transcript entry into view.
    fn scroll_to_latest(&mut self);

    /// Close the connection and clean up resources.
    ///
    /// Waits briefly for the socket to send its close frame.
    fn stop(&mut self) -> impl Future<Output = ()> + Send;
}
