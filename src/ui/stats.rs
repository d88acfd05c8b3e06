//! Statistics row over the displayed articles.

use crate::app::App;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let stats = app.view.stats;
    let line = Line::from(vec![
        Span::styled(" Total Articles: ", app.style("stats_label")),
        Span::styled(stats.total_articles.to_string(), app.style("stats_value")),
        Span::styled("   Categories Found: ", app.style("stats_label")),
        Span::styled(stats.categories_found.to_string(), app.style("stats_value")),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
