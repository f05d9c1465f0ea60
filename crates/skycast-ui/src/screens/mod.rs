//! Screen rendering. Screens are presentation only: they read store
//! state handed to them and draw it; every action goes through the
//! store via the event loop.

pub mod detail;
pub mod favorites;
pub mod search;
pub mod settings;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Vertically centered dimmed message, used for every empty state.
pub fn empty_state(f: &mut Frame, area: Rect, message: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::DarkGray));

    f.render_widget(paragraph, chunks[1]);
}
