//! Article card list.
//!
//! Every card occupies exactly [`CARD_HEIGHT`] rows, so scrolling and mouse
//! hit-testing are plain arithmetic.

use crate::app::App;
use crate::keybindings::{Action, Context};
use crate::pipeline::{ArticleCard, CardLabels};
use crate::surface::NewsPanel;
use crate::theme::StyleMap;
use crate::util::{truncate_to_width, wrap_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// source/date, title, 2 description lines, labels, link, spacer.
pub(super) const CARD_HEIGHT: u16 = 7;
/// Offset of the "Read more" line inside a card.
const LINK_ROW: u16 = 5;
const DESCRIPTION_LINES: usize = 2;
const MARKER_WIDTH: usize = 2;

/// Render the card list panel.
pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let title = match &app.view.news {
        NewsPanel::Cards(cards) => format!(" Articles ({}) ", cards.len()),
        _ => " Articles ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"))
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 4 || inner.height < 1 {
        return;
    }

    match &app.view.news {
        NewsPanel::Empty => {
            if !app.fetch.in_flight() {
                let prompt = match app.keybindings.key_for(Action::FetchNews, Context::Global) {
                    Some(key) => format!("Press {} to fetch & classify news", key),
                    None => "Fetch & classify news from the header button".to_string(),
                };
                render_centered(f, app, inner, &prompt);
            }
        }
        NewsPanel::Placeholder(message) => render_centered(f, app, inner, message),
        NewsPanel::Cards(_) => render_cards(f, app, inner),
    }
}

fn render_centered(f: &mut Frame, app: &App, area: Rect, message: &str) {
    let y = area.y + area.height.saturating_sub(1) / 2;
    let row = Rect::new(area.x, y, area.width, 1);
    let paragraph = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .style(app.style("placeholder"))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, row);
}

fn render_cards(f: &mut Frame, app: &mut App, area: Rect) {
    let per_page = usize::from((area.height / CARD_HEIGHT).max(1));
    app.cards_per_page = per_page;

    // Keep the selected card on screen
    let selected = app.view.selected_card;
    let mut offset = app.view.scroll_offset;
    if selected < offset {
        offset = selected;
    } else if selected >= offset + per_page {
        offset = selected + 1 - per_page;
    }
    app.view.scroll_offset = offset;

    let text_width = usize::from(area.width).saturating_sub(MARKER_WIDTH);
    let mut card_regions = Vec::with_capacity(per_page);
    let mut link_regions = Vec::with_capacity(per_page);

    for (slot, (index, card)) in app
        .view
        .cards()
        .iter()
        .enumerate()
        .skip(offset)
        .take(per_page)
        .enumerate()
    {
        let y = area.y + slot as u16 * CARD_HEIGHT;
        let height = CARD_HEIGHT.min(area.bottom().saturating_sub(y));
        if height == 0 {
            break;
        }
        let rect = Rect::new(area.x, y, area.width, height);

        let lines = card_lines(card, &app.theme, text_width, index == selected);
        f.render_widget(Paragraph::new(lines), rect);

        card_regions.push((rect, index));
        if LINK_ROW < height {
            link_regions.push((Rect::new(area.x, y + LINK_ROW, area.width, 1), index));
        }
    }

    app.regions.cards = card_regions;
    app.regions.card_links = link_regions;
}

/// Lines of one card, `CARD_HEIGHT` long, each prefixed with the selection
/// marker.
pub(super) fn card_lines(
    card: &ArticleCard,
    theme: &StyleMap,
    width: usize,
    selected: bool,
) -> Vec<Line<'static>> {
    let marker = if selected { "▌ " } else { "  " };
    let marker_span = || Span::styled(marker, theme.resolve("card_selected"));
    let line = |spans: Vec<Span<'static>>| {
        let mut all = vec![marker_span()];
        all.extend(spans);
        Line::from(all)
    };

    let mut lines = Vec::with_capacity(usize::from(CARD_HEIGHT));

    let mut header = vec![Span::styled(
        truncate_to_width(&card.source, width).into_owned(),
        theme.resolve("card_source"),
    )];
    if !card.published.is_empty() {
        header.push(Span::raw(" · "));
        header.push(Span::styled(card.published.clone(), theme.resolve("card_date")));
    }
    lines.push(line(header));

    lines.push(line(vec![Span::styled(
        truncate_to_width(&card.title, width).into_owned(),
        theme.resolve("card_title"),
    )]));

    let mut description = wrap_to_width(&card.description, width, DESCRIPTION_LINES);
    description.resize(DESCRIPTION_LINES, String::new());
    for text in description {
        lines.push(line(vec![Span::styled(text, theme.resolve("card_body"))]));
    }

    let label_style = match card.labels {
        CardLabels::Labels(_) => theme.resolve("card_label"),
        CardLabels::Uncategorized => theme.resolve("card_label_uncategorized"),
    };
    let mut labels = Vec::new();
    for (i, label) in card.labels.display().into_iter().enumerate() {
        if i > 0 {
            labels.push(Span::raw(" "));
        }
        labels.push(Span::styled(format!(" {} ", label), label_style));
    }
    lines.push(line(labels));

    let prefix = "Read more → ";
    let link = truncate_to_width(&card.link, width.saturating_sub(prefix.chars().count()));
    lines.push(line(vec![
        Span::raw(prefix),
        Span::styled(link.into_owned(), theme.resolve("card_link")),
    ]));

    lines.push(Line::default());
    lines
}
