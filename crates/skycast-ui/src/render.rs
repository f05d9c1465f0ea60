//! Top-level rendering: header, per-route body, status bar.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use skycast_core::TemperatureUnit;

use crate::app::UiApp;
use crate::navigation::Route;
use crate::screens;

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Render a Celsius value in the configured display unit.
pub fn fmt_temp(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{:.1}{}", unit.convert(celsius), unit.suffix())
}

pub fn draw_ui(f: &mut Frame, app: &UiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.size());

    draw_header(f, chunks[0], app);

    match app.routes.current() {
        Route::Search => {
            screens::search::draw(f, chunks[1], &app.search, app.store.search_results());
        }
        Route::CityDetail { city_id } => {
            let view = screens::detail::DetailView {
                weather: app.store.current_weather(),
                forecast: app.store.forecast(),
                is_favorite: app.store.is_favorite(city_id),
                is_loading: app.store.is_loading(),
                error: app.store.error(),
                unit: app.config.weather.temperature_unit,
            };
            screens::detail::draw(f, chunks[1], &view);
        }
        Route::Favorites => {
            screens::favorites::draw(f, chunks[1], &app.favorites, app.favorites_selected);
        }
        Route::Settings => {
            screens::settings::draw(f, chunks[1], &app.config);
        }
    }

    draw_status_bar(f, chunks[2], app);
}

/// One-line header: app name, version and the tab strip.
fn draw_header(f: &mut Frame, area: Rect, app: &UiApp) {
    let root = app.routes.root().title();

    let mut spans = vec![
        Span::styled(
            format!(" Skycast v{} ", env!("CARGO_PKG_VERSION")),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│"),
    ];

    for tab in ["Search", "Favorites", "Settings"] {
        let style = if tab == root {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(tab, style));
    }

    if let Route::CityDetail { .. } = app.routes.current() {
        if let Some(weather) = app.store.current_weather() {
            spans.push(Span::raw(" › "));
            spans.push(Span::styled(
                weather.city.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// One-line status bar: spinner, error, key hints.
fn draw_status_bar(f: &mut Frame, area: Rect, app: &UiApp) {
    let mut spans = Vec::new();

    if app.store.is_loading() {
        let frame = SPINNER_FRAMES[app.tick % SPINNER_FRAMES.len()];
        spans.push(Span::styled(
            format!(" {frame} fetching"),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw("  "));
    }

    if let Some(error) = app.store.error() {
        spans.push(Span::styled(
            format!(" ✗ {error}"),
            Style::default().fg(Color::Red),
        ));
        spans.push(Span::raw("  "));
    }

    let hints = match app.routes.current() {
        Route::Search => "type to search · Enter search/open · ↑↓ select · Tab tabs · Ctrl-C quit",
        Route::CityDetail { .. } => "f favorite · r refresh · Esc back · q quit",
        Route::Favorites => "↑↓ select · Enter open · d remove · Tab tabs · q quit",
        Route::Settings => "u switch unit · Tab tabs · q quit",
    };
    spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
