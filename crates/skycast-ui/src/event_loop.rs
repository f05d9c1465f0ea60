//! Main TUI entry point: terminal setup/teardown and the event loop.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use crate::app::UiApp;
use crate::navigation::Route;
use crate::render::draw_ui;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the TUI until the user quits.
pub async fn run(mut app: UiApp) -> Result<()> {
    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!("Failed to enable raw mode: {}. Run skycast in a real terminal (TTY).", e)
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        anyhow::anyhow!("Failed to initialize terminal: {}", e)
    })?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Always attempt cleanup, even when the loop errored.
    let cleanup_result = restore_terminal(&mut terminal);

    result.and(cleanup_result)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut UiApp,
) -> Result<()> {
    loop {
        app.drain_messages();
        app.maybe_auto_refresh();

        if app.store.is_loading() {
            app.tick = app.tick.wrapping_add(1);
        }

        terminal.draw(|f| draw_ui(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut UiApp, key: KeyEvent) {
    // Global bindings first
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        (KeyCode::Tab, _) => {
            app.switch_tab();
            return;
        }
        (KeyCode::Esc, _) => {
            app.routes.pop();
            return;
        }
        _ => {}
    }

    match app.routes.current().clone() {
        Route::Search => handle_search_key(app, key),
        Route::CityDetail { .. } => handle_detail_key(app, key),
        Route::Favorites => handle_favorites_key(app, key),
        Route::Settings => handle_settings_key(app, key),
    }
}

fn handle_search_key(app: &mut UiApp, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            if let Some(i) = app.search.selected {
                if let Some(city) = app.store.search_results().get(i) {
                    let id = city.id.clone();
                    app.open_city(id);
                }
            } else if !app.search.input.trim().is_empty() {
                let query = app.search.input.clone();
                app.store.search_location(&query);
                app.search.has_searched = true;
                app.search.selected = None;
            }
        }
        KeyCode::Down => {
            let len = app.store.search_results().len();
            if len > 0 {
                app.search.selected = Some(match app.search.selected {
                    Some(i) if i + 1 < len => i + 1,
                    Some(i) => i,
                    None => 0,
                });
            }
        }
        KeyCode::Up => {
            app.search.selected = match app.search.selected {
                Some(0) | None => None, // back to the input line
                Some(i) => Some(i - 1),
            };
        }
        KeyCode::Backspace => {
            app.search.input.pop();
            app.search.selected = None;
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search.input.push(c);
            app.search.selected = None;
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut UiApp, key: KeyEvent) {
    match key.code {
        KeyCode::Char('f') => app.toggle_favorite(),
        KeyCode::Char('r') => app.refresh_detail(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_favorites_key(app: &mut UiApp, key: KeyEvent) {
    match key.code {
        KeyCode::Down => {
            if !app.favorites.is_empty()
                && app.favorites_selected + 1 < app.favorites.len()
            {
                app.favorites_selected += 1;
            }
        }
        KeyCode::Up => {
            app.favorites_selected = app.favorites_selected.saturating_sub(1);
        }
        KeyCode::Enter => {
            if let Some(city) = app.favorites.get(app.favorites_selected) {
                let id = city.id.clone();
                app.open_city(id);
            }
        }
        KeyCode::Char('d') => app.remove_selected_favorite(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_settings_key(app: &mut UiApp, key: KeyEvent) {
    match key.code {
        KeyCode::Char('u') => {
            app.config.weather.temperature_unit = app.config.weather.temperature_unit.toggled();
            if let Err(e) = app.config.save() {
                tracing::warn!("Failed to save config: {}", e);
            }
        }
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}
