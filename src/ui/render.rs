//! Frame composition for the dashboard.

use crate::app::{App, ScreenRegions};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

use super::{articles, categories, header, help, stats, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 15;

/// Draw one frame and record the clickable regions for the mouse handler.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    app.regions = ScreenRegions::default();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let stats_height = u16::from(app.view.stats_visible);
    let error_height = u16::from(app.view.error.is_some());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(stats_height),
            Constraint::Length(error_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    header::render(f, app, chunks[0]);
    if app.view.stats_visible {
        stats::render(f, app, chunks[1]);
    }
    if app.view.error.is_some() {
        render_error(f, app, chunks[2]);
    }
    articles::render(f, app, chunks[3]);
    status::render(f, app, chunks[4]);

    // Overlays last so they sit on top
    if app.dropdown.is_open() {
        categories::render(f, app, area);
    }
    if app.show_help {
        help::render(f, app);
    }
}

fn render_error(f: &mut Frame, app: &App, area: Rect) {
    if let Some(error) = &app.view.error {
        let paragraph = Paragraph::new(format!(" ✗ {} ", error)).style(app.style("error"));
        f.render_widget(paragraph, area);
    }
}
