//! Chat area
//!
//! Displays the transcript, newest at the bottom.

use chrono::{DateTime, Local};
use partyline_app::{App, ChatMessage};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
///
/// `scroll` is how many of the newest entries are hidden below the view.
pub fn render(frame: &mut Frame, app: &App, scroll: usize, area: Rect) {
    let title = if scroll > 0 { format!(" Chat (+{scroll} newer) ") } else { " Chat ".to_string() };
    let block = Block::default().borders(Borders::ALL).title(title);

    let transcript = app.transcript().as_slice();
    if transcript.is_empty() {
        let hint = ListItem::new(Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(List::new(vec![hint]).block(block), area);
        return;
    }

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let end = transcript.len().saturating_sub(scroll);
    let start = end.saturating_sub(visible_height);

    let items: Vec<ListItem> = transcript[start..end].iter().map(line).collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn line(message: &ChatMessage) -> ListItem<'_> {
    let time = DateTime::<Local>::from(message.time).format("%H:%M:%S").to_string();

    ListItem::new(Line::from(vec![
        Span::styled(time, Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(
            message.user.as_str(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(": "),
        Span::raw(message.message.as_str()),
    ]))
}
