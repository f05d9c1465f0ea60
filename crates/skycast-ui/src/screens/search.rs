//! Search screen: query input and the geocoding result list.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use skycast_weather::City;

use crate::app::SearchState;
use crate::screens::empty_state;

pub fn draw(f: &mut Frame, area: Rect, search: &SearchState, results: &[City]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    draw_input(f, chunks[0], search);

    if !results.is_empty() {
        draw_results(f, chunks[1], search, results);
    } else if search.has_searched {
        empty_state(f, chunks[1], "No cities found. Try a different search term.");
    } else {
        empty_state(f, chunks[1], "Search for a city to see weather information.");
    }
}

fn draw_input(f: &mut Frame, area: Rect, search: &SearchState) {
    // Block cursor only while the input line has focus
    let cursor = if search.selected.is_none() { "█" } else { "" };
    let line = Line::from(vec![
        Span::raw(search.input.as_str()),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]);

    let input = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search city "),
    );
    f.render_widget(input, area);
}

fn draw_results(f: &mut Frame, area: Rect, search: &SearchState, results: &[City]) {
    let items: Vec<ListItem> = results
        .iter()
        .map(|city| {
            ListItem::new(format!(
                "{}, {}  ({:.2}, {:.2})",
                city.name, city.country, city.latitude, city.longitude
            ))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Results "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("» ");

    let mut state = ListState::default();
    state.select(search.selected);
    f.render_stateful_widget(list, area, &mut state);
}
