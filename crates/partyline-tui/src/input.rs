//! Input state and key handling for the TUI.
//!
//! This module owns all text input state (buffer, cursor, transcript scroll)
//! and handles character-level key events. Command parsing happens here on
//! Enter.

use partyline_app::{App, AppAction};

use crate::commands::{self, Command};

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Input state for the TUI.
///
/// Manages the text input buffer, the cursor position (in characters) and
/// how far the transcript view is scrolled back from its newest entry.
#[derive(Debug, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
    scroll: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position, in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Transcript entries hidden below the view. Zero follows the newest.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Snap the transcript view back to its newest entry.
    pub fn scroll_to_latest(&mut self) {
        self.scroll = 0;
    }

    /// Handle a key input event.
    ///
    /// Returns actions to process (may be empty for input-only keys,
    /// or contain transport actions for commands).
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.char_len() {
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.char_len(),
            KeyInput::Up => {
                let oldest = app.transcript().len().saturating_sub(1);
                self.scroll = (self.scroll + 1).min(oldest);
            },
            KeyInput::Down => self.scroll = self.scroll.saturating_sub(1),
            KeyInput::Enter => return self.handle_enter(app),
            KeyInput::Esc => return app.quit(),
        }
        vec![AppAction::Render]
    }

    /// Handle Enter key - parse command and call App API.
    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        let command = commands::parse(&self.buffer);

        let actions = match command {
            Command::Connect => app.connect(),
            Command::Disconnect => app.disconnect(),
            Command::Quit => app.quit(),
            Command::Message { content } => match app.send_message(content) {
                Ok(mut actions) => {
                    actions.push(AppAction::Render);
                    actions
                },
                Err(e) => {
                    // Keep what was typed
                    app.set_status(e.to_string());
                    return vec![AppAction::Render];
                },
            },
            Command::Unknown { input } => {
                app.set_status(format!("Unknown command: {input}"));
                vec![AppAction::Render]
            },
        };

        self.buffer.clear();
        self.cursor = 0;
        actions
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(at, _)| at)
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use partyline_app::{AppEvent, ReconcilerConfig};
    use partyline_proto::{Endpoint, Frame};

    use super::*;

    fn app() -> App {
        App::new(Endpoint::new("localhost:1999", "lobby", "alice"), &ReconcilerConfig::default())
    }

    fn type_text(input: &mut InputState, app: &mut App, text: &str) {
        for c in text.chars() {
            input.handle_key(KeyInput::Char(c), app);
        }
    }

    #[test]
    fn char_input_adds_to_buffer() {
        let mut input = InputState::new();
        let mut app = app();

        type_text(&mut input, &mut app, "hi");

        assert_eq!(input.buffer(), "hi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn backspace_removes_char() {
        let mut input = InputState::new();
        let mut app = app();

        type_text(&mut input, &mut app, "ab");
        input.handle_key(KeyInput::Backspace, &mut app);

        assert_eq!(input.buffer(), "a");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn multibyte_editing() {
        let mut input = InputState::new();
        let mut app = app();

        type_text(&mut input, &mut app, "héllo");
        input.handle_key(KeyInput::Home, &mut app);
        input.handle_key(KeyInput::Right, &mut app);
        input.handle_key(KeyInput::Delete, &mut app);
        input.handle_key(KeyInput::Char('e'), &mut app);

        assert_eq!(input.buffer(), "hello");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn cursor_movement() {
        let mut input = InputState::new();
        let mut app = app();

        type_text(&mut input, &mut app, "abc");

        input.handle_key(KeyInput::Home, &mut app);
        assert_eq!(input.cursor(), 0);

        input.handle_key(KeyInput::End, &mut app);
        assert_eq!(input.cursor(), 3);

        input.handle_key(KeyInput::Left, &mut app);
        assert_eq!(input.cursor(), 2);

        input.handle_key(KeyInput::Right, &mut app);
        input.handle_key(KeyInput::Right, &mut app);
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn enter_sends_and_clears_buffer() {
        let mut input = InputState::new();
        let mut app = app();

        type_text(&mut input, &mut app, "test");
        let actions = input.handle_key(KeyInput::Enter, &mut app);

        assert_eq!(actions, vec![AppAction::Send { text: "test".into() }, AppAction::Render]);
        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn escaped_slash_is_sent_as_text() {
        let mut input = InputState::new();
        let mut app = app();

        type_text(&mut input, &mut app, "//r/rust rocks");
        let actions = input.handle_key(KeyInput::Enter, &mut app);

        assert_eq!(
            actions,
            vec![AppAction::Send { text: "/r/rust rocks".into() }, AppAction::Render]
        );
    }

    #[test]
    fn empty_enter_shows_error() {
        let mut input = InputState::new();
        let mut app = app();

        let actions = input.handle_key(KeyInput::Enter, &mut app);

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.status_message(), Some("No message to send!"));
    }

    #[test]
    fn slash_commands_map_to_intents() {
        let mut input = InputState::new();
        let mut app = app();

        type_text(&mut input, &mut app, "/connect");
        let actions = input.handle_key(KeyInput::Enter, &mut app);
        assert!(matches!(actions.first(), Some(AppAction::Connect { .. })));

        type_text(&mut input, &mut app, "/quit");
        assert_eq!(input.handle_key(KeyInput::Enter, &mut app), vec![AppAction::Quit]);

        type_text(&mut input, &mut app, "/nope");
        input.handle_key(KeyInput::Enter, &mut app);
        assert_eq!(app.status_message(), Some("Unknown command: /nope"));
    }

    #[test]
    fn esc_quits() {
        let mut input = InputState::new();
        let mut app = app();

        assert_eq!(input.handle_key(KeyInput::Esc, &mut app), vec![AppAction::Quit]);
    }

    #[test]
    fn scroll_is_bounded_by_transcript() {
        let mut input = InputState::new();
        let mut app = app();
        for i in 0..3 {
            app.handle(AppEvent::FrameReceived {
                frame: Frame::new(format!(r#"{{"user":"a","message":"{i}"}}"#)),
                received_at: SystemTime::UNIX_EPOCH,
            });
        }

        for _ in 0..5 {
            input.handle_key(KeyInput::Up, &mut app);
        }
        assert_eq!(input.scroll(), 2);

        input.handle_key(KeyInput::Down, &mut app);
        assert_eq!(input.scroll(), 1);

        input.scroll_to_latest();
        assert_eq!(input.scroll(), 0);
    }
}
