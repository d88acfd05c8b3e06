//! Header row: fetch button, loader and the category trigger.

use crate::app::App;
use crate::fetcher::{FETCH_LABEL, SPINNER_FRAMES};
use crate::util::{display_width, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SPINNER: [&str; SPINNER_FRAMES] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const TRIGGER_CAPTION: &str = "Categories: ";
const MAX_TRIGGER_WIDTH: u16 = 36;

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"))
        .title(" News Dashboard ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 || inner.width < 10 {
        return;
    }
    let row = Rect { height: 1, ..inner };

    // Fixed width so the button does not jump when the label changes
    let button_width = (display_width(FETCH_LABEL) as u16 + 2).min(row.width);
    let button = Rect::new(row.x, row.y, button_width, 1);
    let button_style = if app.fetch.is_enabled() {
        app.style("button")
    } else {
        app.style("button_disabled")
    };
    f.render_widget(
        Paragraph::new(app.fetch.label())
            .alignment(Alignment::Center)
            .style(button_style),
        button,
    );
    app.regions.fetch_button = button;

    let loader_x = button.right() + 1;
    if app.fetch.loader_visible() && loader_x < row.right() {
        let frame = SPINNER[app.fetch.spinner_frame() % SPINNER_FRAMES];
        f.render_widget(
            Paragraph::new(frame).style(app.style("loader")),
            Rect::new(loader_x, row.y, 1, 1),
        );
    }

    let caption_x = loader_x + 3;
    let caption_width = display_width(TRIGGER_CAPTION) as u16;
    let trigger_x = caption_x + caption_width;
    if trigger_x + 8 > row.right() {
        app.regions.trigger = Rect::default();
        return;
    }
    f.render_widget(
        Paragraph::new(TRIGGER_CAPTION).style(app.style("stats_label")),
        Rect::new(caption_x, row.y, caption_width, 1),
    );

    let trigger_width = (row.right() - trigger_x).min(MAX_TRIGGER_WIDTH);
    let trigger = Rect::new(trigger_x, row.y, trigger_width, 1);
    let arrow = if app.dropdown.is_open() { "▴" } else { "▾" };
    let summary = app.dropdown.summary();
    let summary = strip_control_chars(&summary);
    let text_width = usize::from(trigger_width).saturating_sub(4);
    let summary_style = if app.dropdown.selection().is_empty() {
        app.style("trigger")
    } else {
        app.style("trigger_has_selection")
    };
    let border_style = if app.dropdown.is_open() {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let padded = format!(
        "{:<width$}",
        truncate_to_width(&summary, text_width),
        width = text_width
    );
    let line = Line::from(vec![
        Span::styled("[", border_style),
        Span::styled(padded, summary_style),
        Span::styled(format!(" {}", arrow), border_style),
        Span::styled("]", border_style),
    ]);
    f.render_widget(Paragraph::new(line), trigger);
    app.regions.trigger = trigger;
}
