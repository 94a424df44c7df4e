//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`partyline_app::Runtime`] orchestration code runs in both production and
//! simulation.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, SystemTime},
};

use partyline_app::{App, AppAction, AppEvent, ConnectionState, Driver};
use partyline_proto::{Endpoint, Frame, TransportEvent};
use thiserror::Error;

use crate::invariants::{InvariantRegistry, SessionSnapshot};

/// Error type for simulation driver.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimDriverError {
    /// A scripted connection refusal.
    #[error("connection refused: {0}")]
    Refused(String),

    /// Text was sent without an open socket.
    #[error("not connected")]
    NotConnected,

    /// An invariant failed after a render.
    #[error("invariant violation: {0}")]
    Invariant(String),
}

/// A scripted user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    /// Deliver an event straight to the App.
    Event(AppEvent),
    /// Submit text from the input line.
    Send(String),
    /// Ask to connect.
    Connect,
    /// Ask to disconnect.
    Disconnect,
    /// Ask to quit.
    Quit,
}

/// Shared state for event injection.
///
/// This allows injection from outside async contexts.
struct SharedState {
    pending_intents: VecDeque<UserIntent>,
    incoming: VecDeque<TransportEvent>,
    outgoing: Vec<String>,
    connected: bool,
    refuse_connect: Option<String>,
    connect_attempts: Vec<Endpoint>,
    /// Last connection state drawn when each connect attempt started.
    screen_at_connect: Vec<Option<ConnectionState>>,
    now: SystemTime,
    rendered_states: Vec<ConnectionState>,
    scrolls: usize,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            pending_intents: VecDeque::new(),
            incoming: VecDeque::new(),
            outgoing: Vec::new(),
            connected: false,
            refuse_connect: None,
            connect_attempts: Vec::new(),
            screen_at_connect: Vec::new(),
            now: SimDriver::EPOCH,
            rendered_states: Vec::new(),
            scrolls: 0,
        }
    }
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`partyline_app::Runtime`]
/// orchestration code runs in both production TUI and simulation tests.
/// Cloning shares the underlying state, so a test can keep a handle for
/// injection after moving the driver into a runtime.
#[derive(Clone)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    invariants: Option<Arc<InvariantRegistry>>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Start of simulated time.
    pub const EPOCH: SystemTime = SystemTime::UNIX_EPOCH;

    /// Create a new simulation driver.
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(SharedState::default())), invariants: None }
    }

    /// Enable invariant checking after every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(Arc::new(registry));
        self
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inject a user intent.
    pub fn inject_intent(&self, intent: UserIntent) {
        self.lock().pending_intents.push_back(intent);
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.inject_intent(UserIntent::Event(event));
    }

    /// Inject a frame from the room.
    pub fn inject_frame(&self, frame: Frame) {
        self.lock().incoming.push_back(TransportEvent::Message(frame));
    }

    /// Inject several frames from the room, in order.
    pub fn inject_frames(&self, frames: impl IntoIterator<Item = Frame>) {
        let mut state = self.lock();
        state.incoming.extend(frames.into_iter().map(TransportEvent::Message));
    }

    /// Inject a raw transport event.
    pub fn inject_transport(&self, event: TransportEvent) {
        self.lock().incoming.push_back(event);
    }

    /// Make the next connection attempts fail with `reason`.
    pub fn refuse_connections(&self, reason: impl Into<String>) {
        self.lock().refuse_connect = Some(reason.into());
    }

    /// Let connection attempts succeed again.
    pub fn accept_connections(&self) {
        self.lock().refuse_connect = None;
    }

    /// Advance the simulated clock.
    pub fn advance(&self, by: Duration) {
        let mut state = self.lock();
        state.now += by;
    }

    /// Take all captured outgoing texts.
    pub fn take_outgoing(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().outgoing)
    }

    /// Endpoints of every connection attempt so far.
    pub fn connect_attempts(&self) -> Vec<Endpoint> {
        self.lock().connect_attempts.clone()
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        self.lock().rendered_states.len()
    }

    /// Connection state shown by each render, in order.
    pub fn rendered_states(&self) -> Vec<ConnectionState> {
        self.lock().rendered_states.clone()
    }

    /// For each connect attempt, the connection state on screen when it
    /// started. `None` if nothing had been rendered yet.
    pub fn screen_at_connect(&self) -> Vec<Option<ConnectionState>> {
        self.lock().screen_at_connect.clone()
    }

    /// Number of scroll-to-latest requests so far.
    pub fn scroll_count(&self) -> usize {
        self.lock().scrolls
    }

    /// Check if there are pending intents or transport events.
    pub fn has_pending(&self) -> bool {
        let state = self.lock();
        !state.pending_intents.is_empty() || (state.connected && !state.incoming.is_empty())
    }

    /// Check invariants against App state.
    pub fn check_invariants(&self, app: &App) -> Result<(), SimDriverError> {
        let Some(registry) = &self.invariants else {
            return Ok(());
        };
        registry.check_all(&SessionSnapshot::from_app(app)).map_err(|violations| {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            SimDriverError::Invariant(messages.join("; "))
        })
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        let intent = self.lock().pending_intents.pop_front();

        let actions = match intent {
            None => vec![],
            Some(UserIntent::Event(event)) => app.handle(event),
            Some(UserIntent::Send(text)) => match app.send_message(text) {
                Ok(actions) => actions,
                Err(e) => {
                    app.set_status(e.to_string());
                    vec![AppAction::Render]
                },
            },
            Some(UserIntent::Connect) => app.connect(),
            Some(UserIntent::Disconnect) => app.disconnect(),
            Some(UserIntent::Quit) => app.quit(),
        };
        Ok(actions)
    }

    async fn send_text(&mut self, text: String) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if !state.connected {
            return Err(SimDriverError::NotConnected);
        }
        state.outgoing.push(text);
        Ok(())
    }

    async fn recv_event(&mut self) -> Option<TransportEvent> {
        let mut state = self.lock();
        if !state.connected {
            return None;
        }
        let event = state.incoming.pop_front()?;
        if event == TransportEvent::Close {
            state.connected = false;
        }
        Some(event)
    }

    async fn connect(&mut self, endpoint: &Endpoint) -> Result<(), Self::Error> {
        let mut state = self.lock();
        state.connect_attempts.push(endpoint.clone());
        let on_screen = state.rendered_states.last().cloned();
        state.screen_at_connect.push(on_screen);
        if let Some(reason) = &state.refuse_connect {
            return Err(SimDriverError::Refused(reason.clone()));
        }

        tracing::debug!(%endpoint, "simulated socket open");
        state.connected = true;
        // The socket opens before it delivers anything
        state.incoming.push_front(TransportEvent::Open);
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut state = self.lock();
        state.connected = false;
        state.incoming.clear();
    }

    fn is_connected(&self) -> bool {
        self.lock().connected
    }

    fn now(&self) -> SystemTime {
        self.lock().now
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.lock().rendered_states.push(app.connection_state().clone());
        self.check_invariants(app)
    }

    fn scroll_to_latest(&mut self) {
        self.lock().scrolls += 1;
    }

    async fn stop(&mut self) {
        self.disconnect();
    }
}
