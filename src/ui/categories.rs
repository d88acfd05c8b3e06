//! Category dropdown overlay.

use crate::app::{App, CategoryLoad};
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const MIN_PANEL_WIDTH: u16 = 30;
const SELECT_ALL_LABEL: &str = "[Select All]";
const CLEAR_ALL_LABEL: &str = "[Clear All]";

/// Draw the open dropdown below its trigger and record its hit regions.
pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let trigger = app.regions.trigger;
    if trigger.width == 0 {
        return;
    }

    let width = trigger.width.max(MIN_PANEL_WIDTH).min(area.width);
    let x = trigger.x.min(area.right().saturating_sub(width));
    let y = trigger.y + 1;
    // Stop above the status bar
    let available = area.bottom().saturating_sub(y + 1);
    let rows = app.dropdown.option_count().max(1) as u16;
    let height = rows.saturating_add(3).min(available);
    if height < 4 {
        return;
    }

    let panel = Rect::new(x, y, width, height);
    f.render_widget(Clear, panel);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(" Filter by category ");
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let select_all = Rect::new(inner.x, inner.y, (SELECT_ALL_LABEL.len() as u16).min(inner.width), 1);
    let clear_x = select_all.right() + 1;
    let clear_all = Rect::new(
        clear_x,
        inner.y,
        (CLEAR_ALL_LABEL.len() as u16).min(inner.right().saturating_sub(clear_x)),
        1,
    );
    f.render_widget(
        Paragraph::new(SELECT_ALL_LABEL).style(app.style("button")),
        select_all,
    );
    f.render_widget(
        Paragraph::new(CLEAR_ALL_LABEL).style(app.style("button")),
        clear_all,
    );

    let list = Rect {
        y: inner.y + 1,
        height: inner.height.saturating_sub(1),
        ..inner
    };
    let visible = usize::from(list.height);
    let mut option_regions = Vec::with_capacity(visible);

    if app.dropdown.option_count() == 0 {
        let message = match app.category_load {
            CategoryLoad::Pending => "Loading categories...",
            CategoryLoad::Failed => "Categories unavailable",
            CategoryLoad::Loaded => "No categories",
        };
        f.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(app.style("placeholder")),
            list,
        );
    } else if visible > 0 {
        let cursor = app.dropdown.cursor();
        let offset = (cursor + 1).saturating_sub(visible);
        let label_width = usize::from(list.width).saturating_sub(4);

        for (slot, (index, option)) in app
            .dropdown
            .options()
            .enumerate()
            .skip(offset)
            .take(visible)
            .enumerate()
        {
            let row = Rect::new(list.x, list.y + slot as u16, list.width, 1);
            let checkbox = if option.checked { "[x]" } else { "[ ]" };
            let category = strip_control_chars(option.category);
            let text = format!(
                "{} {}",
                checkbox,
                truncate_to_width(&category, label_width)
            );

            let mut style = if option.checked {
                app.style("option_selected")
            } else {
                app.style("option_normal")
            };
            if option.highlighted {
                style = style.patch(app.style("option_highlighted"));
            }

            f.render_widget(Paragraph::new(text).style(style), row);
            option_regions.push((row, index));
        }
    }

    app.regions.dropdown_panel = Some(panel);
    app.regions.select_all = select_all;
    app.regions.clear_all = clear_all;
    app.regions.options = option_regions;
}
