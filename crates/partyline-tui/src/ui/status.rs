//! Status bar
//!
//! Displays the transient status message and endpoint.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::App;

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let message = app.status_message().unwrap_or("Enter to send, Up/Down to scroll, Esc to quit");
    let counts = format!(
        " | {} messages | {} server lines",
        app.transcript().len(),
        app.server_messages().len()
    );

    let status_line = Line::from(vec![
        Span::raw(" "),
        Span::raw(message),
        Span::styled(counts, Style::default().fg(Color::Gray)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
