//! Settings screen: display preferences, persisted on change.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use skycast_core::{Config, TemperatureUnit};

pub fn draw(f: &mut Frame, area: Rect, config: &Config) {
    let unit = match config.weather.temperature_unit {
        TemperatureUnit::Celsius => "Celsius (°C)",
        TemperatureUnit::Fahrenheit => "Fahrenheit (°F)",
    };

    let refresh = if config.weather.refresh_minutes == 0 {
        "disabled".to_string()
    } else {
        format!("every {} min", config.weather.refresh_minutes)
    };

    let lines = vec![
        setting_line("Temperature unit", unit.to_string()),
        setting_line("Auto-refresh", refresh),
        setting_line("Config directory", config.config_dir.display().to_string()),
        Line::raw(""),
        Line::styled(
            "Press u to switch the temperature unit.",
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Settings "));
    f.render_widget(paragraph, area);
}

fn setting_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<18}"),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value),
    ])
}
