use crate::app::App;
use crate::keybindings::{Action, Context, KeybindingRegistry};
use crate::util::display_width;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

const DASHBOARD_HINTS: &[(&[Action], &str)] = &[
    (&[Action::FetchNews], "fetch"),
    (&[Action::ToggleDropdown], "filter"),
    (&[Action::NavDown, Action::NavUp], "move"),
    (&[Action::OpenLink], "open"),
    (&[Action::CycleTheme], "theme"),
    (&[Action::ShowHelp], "help"),
    (&[Action::Quit], "quit"),
];

const DROPDOWN_HINTS: &[(&[Action], &str)] = &[
    (&[Action::ToggleOption], "toggle"),
    (&[Action::SelectAll], "all"),
    (&[Action::ClearAll], "clear"),
    (&[Action::NavDown, Action::NavUp], "move"),
    (&[Action::Back], "close"),
];

/// Key hints for `context`, built from the live bindings so overrides show up.
///
/// Actions left without a key are skipped.
pub(super) fn key_hints(keybindings: &KeybindingRegistry, context: Context) -> String {
    let hints = match context {
        Context::Global => DASHBOARD_HINTS,
        Context::Dropdown => DROPDOWN_HINTS,
    };
    hints
        .iter()
        .filter_map(|(actions, label)| {
            let keys: Vec<String> = actions
                .iter()
                .filter_map(|&action| keybindings.key_for(action, context))
                .collect();
            (!keys.is_empty()).then(|| format!("[{}] {}", keys.join("/"), label))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = match &app.status_message {
        Some((msg, _)) => Cow::Borrowed(msg.as_ref()),
        None => Cow::Owned(key_hints(&app.keybindings, app.input_context())),
    };

    let backend = app.client.base_url().as_str();
    let backend_width = (display_width(backend) as u16 + 2).min(area.width / 3);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(backend_width)])
        .split(area);

    let style = app.style("status_bar");
    f.render_widget(Paragraph::new(text).style(style), chunks[0]);
    f.render_widget(
        Paragraph::new(backend)
            .alignment(Alignment::Right)
            .style(style),
        chunks[1],
    );
}
