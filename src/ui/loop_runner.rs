//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, background task events, and periodic ticks.

use crate::app::{App, AppEvent};
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::input::{handle_input, handle_mouse};
use super::render::render;

/// Result of handling a key press event.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the dashboard event loop.
///
/// Uses `tokio::select!` to multiplex:
/// - **Terminal input**: keys and mouse from crossterm's async event stream
/// - **Background tasks**: category load and news fetch via `AppEvent`
/// - **Periodic tick**: 250ms timer for the loader spinner and status expiry
///
/// Installs a panic hook that restores the terminal before unwinding, so a
/// panic never leaves it in raw mode with mouse capture on.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    // On non-Unix platforms these become futures that never complete
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        settle_and_draw(&mut terminal, app, &mut event_rx)?;

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.needs_redraw = true;
                        match handle_input(app, key.code, key.modifiers, &event_tx) {
                            Ok(Action::Quit) => break,
                            Ok(Action::Continue) => {}
                            Err(e) => app.set_status(format!("Error: {}", e)),
                        }
                    }
                    Some(Ok(Event::Mouse(mouse))) => {
                        if handle_mouse(app, mouse, &event_tx) {
                            app.needs_redraw = true;
                        }
                    }
                    Some(Ok(Event::Resize(..))) => app.needs_redraw = true,
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event stream error"),
                    None => break,
                    _ => {}
                }
            }

            Some(event) = event_rx.recv() => {
                app.needs_redraw = true;
                handle_app_event(app, event);
            }

            _ = tick_interval.tick() => {
                if app.fetch.tick() {
                    app.needs_redraw = true;
                }
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Apply finished background work, then redraw if anything changed.
///
/// Draining comes first so the click regions recorded by the draw always
/// describe the state the next mouse event is hit-tested against.
fn settle_and_draw<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    while let Ok(event) = event_rx.try_recv() {
        app.needs_redraw = true;
        handle_app_event(app, event);
    }

    if app.clear_expired_status() {
        app.needs_redraw = true;
    }

    if app.needs_redraw {
        terminal.draw(|f| render(f, app))?;
        app.needs_redraw = false;
    }
    Ok(())
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{NewsClient, NewsResponse};
    use crate::app::HitTarget;
    use crate::keybindings::KeybindingRegistry;
    use crate::theme::ThemeVariant;
    use ratatui::backend::TestBackend;

    fn test_app() -> App {
        let client = NewsClient::new("http://127.0.0.1:5000", Duration::from_secs(5)).unwrap();
        App::new(client, ThemeVariant::Dark, KeybindingRegistry::new())
    }

    #[tokio::test]
    async fn test_regions_reflect_drained_events() {
        let mut app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let (tx, mut rx) = mpsc::channel(4);

        settle_and_draw(&mut terminal, &mut app, &mut rx).unwrap();
        assert!(app.regions.cards.is_empty());

        app.begin_fetch();
        let articles = serde_json::from_value(serde_json::json!([
            {"title": "First", "link": "https://a.example"},
            {"title": "Second", "link": "https://b.example"}
        ]))
        .unwrap();
        let sent = tx
            .send(AppEvent::NewsFetched(Ok(NewsResponse {
                success: true,
                articles: Some(articles),
                error: None,
                total: Some(2),
            })))
            .await;
        assert!(sent.is_ok());

        settle_and_draw(&mut terminal, &mut app, &mut rx).unwrap();
        assert!(!app.needs_redraw);
        assert_eq!(app.regions.card_links.len(), 2);

        let (rect, index) = app.regions.card_links[1];
        assert_eq!(app.regions.hit(rect.x, rect.y), Some(HitTarget::CardLink(index)));
        assert_eq!(app.link_for_card(index).unwrap().as_str(), "https://b.example/");
    }
}
