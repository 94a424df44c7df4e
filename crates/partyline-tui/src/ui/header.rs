//! Header line
//!
//! Welcome line, connection status, live indicator and room occupancy.

use partyline_app::{App, ConnectionState};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Shown next to the status while connected.
pub const LIVE_INDICATOR: &str = "●";

/// Render the header line.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let welcome = match app.connection_state().user_name() {
        Some(name) => format!(" Welcome, {name}! "),
        None => " Welcome! ".to_string(),
    };

    let mut spans = vec![
        Span::styled(welcome, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("#{} ", app.endpoint().room()), Style::default().fg(Color::Cyan)),
        connection_span(app.connection_state()),
    ];

    if app.show_live_indicator() {
        spans.push(Span::styled(format!(" {LIVE_INDICATOR}"), Style::default().fg(Color::Green)));
    }

    if let Some(count) = app.occupancy() {
        spans.push(Span::styled(
            format!(" | {count} online"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn connection_span(state: &ConnectionState) -> Span<'static> {
    match state {
        ConnectionState::Disconnected => {
            Span::styled("disconnected", Style::default().fg(Color::Red))
        },
        ConnectionState::Connecting => {
            Span::styled("connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Connected { .. } => Span::styled(
            "connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        ConnectionState::Error { message } => {
            Span::styled(format!("error: {message}"), Style::default().fg(Color::Red))
        },
    }
}
