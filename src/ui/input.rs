//! Keyboard and mouse input handling.

use crate::app::{App, AppEvent, ClickCommand};
use crate::keybindings::Action as KbAction;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use tokio::sync::mpsc;

use super::helpers::start_fetch;
use super::Action;

/// Main key dispatch.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Help overlay captures all keys while visible
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    let context = app.input_context();
    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        return Ok(Action::Continue);
    };
    tracing::debug!(?action, ?context, "Key action");

    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::Back => {
            if !app.dropdown.close() {
                app.status_message = None;
            }
        }
        KbAction::NavDown if app.dropdown.is_open() => app.dropdown.cursor_down(),
        KbAction::NavUp if app.dropdown.is_open() => app.dropdown.cursor_up(),
        KbAction::NavDown => app.view.select_next(),
        KbAction::NavUp => app.view.select_prev(),
        KbAction::GoTop => app.view.select_first(),
        KbAction::GoBottom => app.view.select_last(),
        KbAction::PageDown => app.page_down(),
        KbAction::PageUp => app.page_up(),
        KbAction::FetchNews => start_fetch(app, event_tx),
        KbAction::ToggleDropdown => app.dropdown.click_trigger(),
        KbAction::ToggleOption => {
            app.toggle_highlighted();
        }
        KbAction::SelectAll => app.select_all(),
        KbAction::ClearAll => app.clear_all(),
        KbAction::OpenLink => {
            let index = app.view.selected_card;
            open_link(app, index);
        }
        KbAction::CycleTheme => app.cycle_theme(),
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
    }

    Ok(Action::Continue)
}

/// Handle input while the help overlay is visible.
///
/// j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle a mouse event. Returns true if anything changed.
pub(super) fn handle_mouse(
    app: &mut App,
    mouse: MouseEvent,
    event_tx: &mpsc::Sender<AppEvent>,
) -> bool {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.show_help {
                app.show_help = false;
                return true;
            }
            match app.click(mouse.column, mouse.row) {
                Some(ClickCommand::StartFetch) => start_fetch(app, event_tx),
                Some(ClickCommand::OpenLink(index)) => open_link(app, index),
                None => {}
            }
            true
        }
        MouseEventKind::ScrollDown => {
            if over_dropdown(app, mouse) {
                app.dropdown.cursor_down();
            } else {
                app.view.select_next();
            }
            true
        }
        MouseEventKind::ScrollUp => {
            if over_dropdown(app, mouse) {
                app.dropdown.cursor_up();
            } else {
                app.view.select_prev();
            }
            true
        }
        _ => false,
    }
}

fn over_dropdown(app: &App, mouse: MouseEvent) -> bool {
    app.dropdown.is_open()
        && app
            .regions
            .dropdown_panel
            .is_some_and(|panel| panel.contains(Position::new(mouse.column, mouse.row)))
}

/// Open a card's link in the system browser.
///
/// The link is validated first; only http/https targets reach `open`.
fn open_link(app: &mut App, index: usize) {
    match app.link_for_card(index) {
        Ok(url) => {
            tracing::info!(url = %url, "Opening article in browser");
            if let Err(e) = open::that(url.as_str()) {
                app.set_status(format!("Failed to open browser: {}", e));
            } else {
                app.set_status("Opening in browser...");
            }
        }
        Err(e) => app.set_status(e.to_string()),
    }
}
