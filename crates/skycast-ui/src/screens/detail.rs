//! City detail screen: current conditions card, details grid and the
//! 7-day forecast.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use skycast_core::TemperatureUnit;
use skycast_weather::{CurrentWeather, ForecastDay};

use crate::render::fmt_temp;
use crate::screens::empty_state;

/// Everything the detail screen reads, extracted from store state so
/// rendering stays a pure function of its inputs.
pub struct DetailView<'a> {
    pub weather: Option<&'a CurrentWeather>,
    pub forecast: &'a [ForecastDay],
    pub is_favorite: bool,
    pub is_loading: bool,
    pub error: Option<&'a str>,
    pub unit: TemperatureUnit,
}

pub fn draw(f: &mut Frame, area: Rect, view: &DetailView) {
    let Some(weather) = view.weather else {
        if view.is_loading {
            empty_state(f, area, "Fetching weather data...");
        } else if let Some(error) = view.error {
            empty_state(f, area, &format!("Something went wrong. {error}"));
        } else {
            empty_state(f, area, "No weather data available.");
        }
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);

    draw_current_card(f, chunks[0], weather, view);
    draw_details_grid(f, chunks[1], weather);
    draw_forecast(f, chunks[2], view.forecast, view.unit);

    let updated = Paragraph::new(format!(
        "Last updated: {} UTC",
        weather.updated_at.format("%H:%M")
    ))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(updated, chunks[3]);
}

fn draw_current_card(f: &mut Frame, area: Rect, weather: &CurrentWeather, view: &DetailView) {
    let favorite_mark = if view.is_favorite { " ♥" } else { "" };
    let title = format!(" {}{} ", weather.city, favorite_mark);

    let line = Line::from(vec![
        Span::styled(
            fmt_temp(weather.temperature, view.unit),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(weather.condition.glyph()),
        Span::raw(" "),
        Span::raw(weather.condition.description()),
    ]);

    let card = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(card, area);
}

fn draw_details_grid(f: &mut Frame, area: Rect, weather: &CurrentWeather) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let left = Paragraph::new(vec![
        detail_line("Humidity", format!("{}%", weather.humidity)),
        detail_line("Wind Speed", format!("{:.1} km/h", weather.wind_speed)),
    ]);
    let right = Paragraph::new(vec![
        detail_line("Pressure", format!("{:.1} hPa", weather.pressure)),
        detail_line("Visibility", format!("{:.1} km", weather.visibility)),
    ]);

    f.render_widget(left, columns[0]);
    f.render_widget(right, columns[1]);
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<12}"),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value),
    ])
}

fn draw_forecast(f: &mut Frame, area: Rect, forecast: &[ForecastDay], unit: TemperatureUnit) {
    let items: Vec<ListItem> = forecast
        .iter()
        .map(|day| {
            ListItem::new(format!(
                "{}  {} {:<13} {:>8} / {}",
                day.date.format("%a %b %d"),
                day.condition.glyph(),
                day.condition.description(),
                fmt_temp(day.high, unit),
                fmt_temp(day.low, unit),
            ))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" 7-Day Forecast "),
    );
    f.render_widget(list, area);
}
