//! Roster panel
//!
//! Users believed present, with a hint when the roster is known to be
//! partial.

use partyline_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

/// Render the roster panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let roster = app.roster();
    let title = format!(" Online ({}) ", roster.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    let mut items: Vec<ListItem> = roster
        .iter()
        .map(|user| {
            let style = if user == app.identity() {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(user.as_str(), style)))
        })
        .collect();

    if app.roster_may_be_incomplete() {
        items.push(ListItem::new(Line::from(Span::styled(
            "(others joined earlier)",
            Style::default().fg(Color::DarkGray),
        ))));
    }

    frame.render_widget(List::new(items).block(block), area);
}
