//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: session state machine
//! - [`Driver`]: Platform-specific I/O

use partyline_proto::TransportEvent;

use crate::{App, AppAction, AppEvent, Driver};

/// Upper bound on transport events applied per cycle, so a busy room cannot
/// starve user input.
pub const MAX_EVENTS_PER_CYCLE: usize = 64;

/// Generic runtime that orchestrates App and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime with the given driver and session.
    pub fn new(driver: D, app: App) -> Self {
        Self { driver, app }
    }

    /// Run the main event loop.
    ///
    /// This is the core orchestration loop that:
    /// 1. Opens the room connection
    /// 2. Polls for input events from the driver
    /// 3. Applies transport events to the App in arrival order
    /// 4. Executes the actions the App produces
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        let actions = self.app.connect();
        if !self.process_actions(actions).await? {
            loop {
                let should_quit = self.process_cycle().await?;
                if should_quit {
                    break;
                }
            }
        }

        self.driver.stop().await;
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    pub async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        let actions = self.driver.poll_event(&mut self.app).await?;
        if !actions.is_empty() && self.process_actions(actions).await? {
            return Ok(true);
        }

        let mut applied = 0;
        while applied < MAX_EVENTS_PER_CYCLE && self.driver.is_connected() {
            let Some(event) = self.driver.recv_event().await else {
                break;
            };
            applied += 1;

            let event = self.stamp(event);
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Translate a transport event into an App event.
    fn stamp(&self, event: TransportEvent) -> AppEvent {
        match event {
            TransportEvent::Open => AppEvent::Opened,
            TransportEvent::Message(frame) => {
                AppEvent::FrameReceived { frame, received_at: self.driver.now() }
            },
            TransportEvent::Close => AppEvent::Closed,
            TransportEvent::Error { message } => AppEvent::TransportError { message },
        }
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    pub async fn process_actions(
        &mut self,
        initial_actions: Vec<AppAction>,
    ) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::ScrollToLatest => self.driver.scroll_to_latest(),
                    AppAction::Quit => return Ok(true),
                    AppAction::Connect { endpoint } => {
                        // The attempt is on screen before the driver starts it
                        self.app.handle(AppEvent::Connecting);
                        self.driver.render(&self.app)?;
                        if let Err(e) = self.driver.connect(&endpoint).await {
                            tracing::warn!(%endpoint, "connect failed: {e}");
                            let event = AppEvent::TransportError { message: e.to_string() };
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                    AppAction::Disconnect => {
                        self.driver.disconnect();
                        pending_actions.extend(self.app.handle(AppEvent::Closed));
                    },
                    AppAction::Send { text } => {
                        if let Err(e) = self.driver.send_text(text).await {
                            tracing::warn!("send failed: {e}");
                        }
                    },
                }
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the Driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
