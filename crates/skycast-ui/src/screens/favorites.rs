//! Favorites screen: the persisted favorite cities.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use skycast_weather::City;

use crate::screens::empty_state;

pub fn draw(f: &mut Frame, area: Rect, favorites: &[City], selected: usize) {
    if favorites.is_empty() {
        empty_state(
            f,
            area,
            "No favorite locations yet. Open a city and press f to add it.",
        );
        return;
    }

    let items: Vec<ListItem> = favorites
        .iter()
        .map(|city| ListItem::new(format!("♥ {}, {}", city.name, city.country)))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Favorites "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("» ");

    let mut state = ListState::default();
    state.select(Some(selected.min(favorites.len() - 1)));
    f.render_stateful_widget(list, area, &mut state);
}
