//! Server messages panel
//!
//! System lines from the room, most recent first.

use partyline_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the server messages panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Server ");

    let text: Vec<Line> =
        app.server_messages().iter().map(|line| Line::raw(line.as_str())).collect();
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: false })
        .block(block);

    frame.render_widget(paragraph, area);
}
