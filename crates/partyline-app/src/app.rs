//! Application state machine.
//!
//! This module defines the [`App`] session object, which owns everything a
//! room session knows: the identity and endpoint it connects with, the
//! connection lifecycle, and the frame-derived projections. It is completely
//! decoupled from I/O.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute. Each
//! event is processed to completion before the next one is accepted, which is
//! what orders transcript appends and roster mutations.
//!
//! # Responsibilities
//!
//! - Routes transport lifecycle events to the [`ConnectionLifecycle`].
//! - Routes frames through classification into the [`Reconciler`].
//! - Validates outbound text before it reaches the transport.
//! - Keeps a transient status line for the UI.

use partyline_proto::Endpoint;

use crate::{
    AppAction, AppError, AppEvent, ConnectionLifecycle, ConnectionState, Reconciler,
    ReconcilerConfig,
    state::{BoundedLog, PresenceEvent, Roster, Transcript},
};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Room endpoint, including the identity presented on connect.
    endpoint: Endpoint,
    /// Connection lifecycle controller.
    lifecycle: ConnectionLifecycle,
    /// Frame-derived projections.
    reconciler: Reconciler,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a session for `endpoint`.
    pub fn new(endpoint: Endpoint, config: &ReconcilerConfig) -> Self {
        Self {
            endpoint,
            lifecycle: ConnectionLifecycle::new(),
            reconciler: Reconciler::new(config),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Resize(..) => vec![AppAction::Render],
            AppEvent::Connecting => {
                self.lifecycle.begin_connect();
                vec![AppAction::Render]
            },
            AppEvent::Opened => {
                self.lifecycle.on_open(self.endpoint.identity());
                self.status_message = Some(format!("Connected to {}", self.endpoint));
                vec![AppAction::Render]
            },
            AppEvent::FrameReceived { frame, received_at } => {
                match self.reconciler.ingest(frame.data(), received_at) {
                    Some(change) if change.transcript_changed() => {
                        vec![AppAction::ScrollToLatest, AppAction::Render]
                    },
                    Some(_) => vec![AppAction::Render],
                    None => vec![],
                }
            },
            AppEvent::Closed => {
                self.lifecycle.on_close();
                vec![AppAction::Render]
            },
            AppEvent::TransportError { message } => {
                self.status_message = Some(format!("Error: {message}"));
                self.lifecycle.on_error(message);
                vec![AppAction::Render]
            },
        }
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Initiate connection to the room.
    pub fn connect(&mut self) -> Vec<AppAction> {
        if !self.lifecycle.begin_connect() {
            self.status_message = Some("Already connected".to_string());
            return vec![AppAction::Render];
        }
        self.status_message = Some(format!("Connecting to {}...", self.endpoint));
        vec![AppAction::Connect { endpoint: self.endpoint.clone() }, AppAction::Render]
    }

    /// Close the room connection.
    pub fn disconnect(&mut self) -> Vec<AppAction> {
        if self.lifecycle.state() == &ConnectionState::Disconnected {
            self.status_message = Some("Not connected".to_string());
            return vec![AppAction::Render];
        }
        vec![AppAction::Disconnect, AppAction::Render]
    }

    /// Send text into the room.
    ///
    /// Text is passed through verbatim. Delivery is fire-and-forget.
    ///
    /// # Errors
    ///
    /// - [`AppError::EmptyMessage`] if `text` is empty. Nothing is sent.
    pub fn send_message(&self, text: impl Into<String>) -> Result<Vec<AppAction>, AppError> {
        let text = text.into();
        if text.is_empty() {
            return Err(AppError::EmptyMessage);
        }
        if !self.lifecycle.show_live_indicator() {
            tracing::warn!(state = self.lifecycle.state().label(), "sending while not connected");
        }
        Ok(vec![AppAction::Send { text }])
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Current connection state.
    pub fn connection_state(&self) -> &ConnectionState {
        self.lifecycle.state()
    }

    /// True iff connected.
    pub fn show_live_indicator(&self) -> bool {
        self.lifecycle.show_live_indicator()
    }

    /// Room endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Identity presented to the room.
    pub fn identity(&self) -> &str {
        self.endpoint.identity()
    }

    /// Frame-derived projections.
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Chat transcript.
    pub fn transcript(&self) -> &Transcript {
        self.reconciler.transcript()
    }

    /// Users believed present.
    pub fn roster(&self) -> &Roster {
        self.reconciler.roster()
    }

    /// Most recent presence event. `None` before any arrives.
    pub fn latest_presence(&self) -> Option<&PresenceEvent> {
        self.reconciler.latest_presence()
    }

    /// Presence events, most recent first.
    pub fn presence_events(&self) -> &BoundedLog<PresenceEvent> {
        self.reconciler.presence_log()
    }

    /// Server messages, most recent first.
    pub fn server_messages(&self) -> &BoundedLog<String> {
        self.reconciler.server_log()
    }

    /// Room occupancy reported by the latest presence event.
    pub fn occupancy(&self) -> Option<u64> {
        self.latest_presence().map(|event| event.connections)
    }

    /// True if the server reports more occupants than the roster knows.
    ///
    /// The roster only learns from events observed since connecting, so a
    /// late joiner sees a partial roster until occupants come and go.
    pub fn roster_may_be_incomplete(&self) -> bool {
        self.reconciler.tracks_roster()
            && self.occupancy().is_some_and(|count| count > self.roster().len() as u64)
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
