//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The room socket comes from
//! [`partyline_client`].

use std::{
    collections::VecDeque,
    io::{self, Stdout, stdout},
    time::{Duration, SystemTime},
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use partyline_app::{App, AppAction, AppEvent, Driver};
use partyline_client::{ConnectedClient, TransportConfig, TransportError, transport};
use partyline_proto::{Endpoint, TransportEvent};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::sync::mpsc::error::TryRecvError;

use crate::{InputState, KeyInput, ui};

/// How long quitting waits for the socket to send its close frame.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Text was sent without an open socket.
    #[error("not connected")]
    NotConnected,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), and the room
/// socket. Owns the input state for text editing and transcript scrolling.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    connection: Option<ConnectedClient>,
    transport_config: TransportConfig,
    /// Transport events received while waiting for input.
    pending: VecDeque<TransportEvent>,
    input_state: InputState,
}

impl TerminalDriver {
    /// Create a new terminal driver.
    pub fn new(transport_config: TransportConfig) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self {
            terminal,
            event_stream,
            connection: None,
            transport_config,
            pending: VecDeque::new(),
            input_state: InputState::new(),
        })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }
}

/// Next event from the socket task. Never resolves without a connection.
async fn next_transport_event(connection: &mut Option<ConnectedClient>) -> TransportEvent {
    match connection {
        Some(conn) => conn.from_server.recv().await.unwrap_or(TransportEvent::Close),
        None => std::future::pending().await,
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        let timeout = Duration::from_millis(100);

        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        match Self::convert_key(key_event.code) {
                            Some(key_input) => Ok(self.input_state.handle_key(key_input, app)),
                            None => Ok(vec![]),
                        }
                    },
                    Some(Ok(Event::Resize(cols, rows))) => {
                        Ok(app.handle(AppEvent::Resize(cols, rows)))
                    },
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    _ => Ok(vec![]),
                }
            }

            // Room traffic wakes the loop; the runtime applies it
            event = next_transport_event(&mut self.connection) => {
                self.pending.push_back(event);
                Ok(vec![])
            }

            // Tick timeout
            () = tokio::time::sleep(timeout) => {
                Ok(app.handle(AppEvent::Tick))
            }
        }
    }

    async fn send_text(&mut self, text: String) -> Result<(), Self::Error> {
        let conn = self.connection.as_ref().ok_or(TerminalError::NotConnected)?;
        conn.send(text).await?;
        Ok(())
    }

    async fn recv_event(&mut self) -> Option<TransportEvent> {
        let event = match self.pending.pop_front() {
            Some(event) => event,
            None => match self.connection.as_mut()?.from_server.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => TransportEvent::Close,
            },
        };

        if event == TransportEvent::Close {
            self.connection = None;
            self.pending.clear();
        }
        Some(event)
    }

    async fn connect(&mut self, endpoint: &Endpoint) -> Result<(), Self::Error> {
        self.disconnect();
        // The handshake runs in the socket task and reports back as events
        let client = transport::connect(endpoint, &self.transport_config)?;
        self.connection = Some(client);
        Ok(())
    }

    fn disconnect(&mut self) {
        // Dropping the client closes the socket with a close frame
        self.connection = None;
        self.pending.clear();
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    #[allow(clippy::disallowed_methods, reason = "receipt stamps are wall-clock time")]
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app, &self.input_state);
        })?;
        Ok(())
    }

    fn scroll_to_latest(&mut self) {
        self.input_state.scroll_to_latest();
    }

    async fn stop(&mut self) {
        self.pending.clear();
        if let Some(conn) = self.connection.take() {
            conn.close(CLOSE_GRACE).await;
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.connection = None;
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
