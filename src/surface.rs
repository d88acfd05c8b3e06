//! In-memory render target for the terminal UI.
//!
//! [`DashboardView`] is what the pipeline and the fetcher write to, and what
//! the ratatui widgets read from when drawing a frame.

use crate::pipeline::{ArticleCard, ArticleStats, DisplaySurface};

/// Content of the news area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NewsPanel {
    /// Nothing rendered yet, or cleared at the start of a fetch.
    #[default]
    Empty,
    /// A single centered message.
    Placeholder(String),
    Cards(Vec<ArticleCard>),
}

#[derive(Debug, Default)]
pub struct DashboardView {
    pub news: NewsPanel,
    pub stats: ArticleStats,
    /// Hidden until the first successful fetch.
    pub stats_visible: bool,
    pub error: Option<String>,
    /// Index of the highlighted card.
    pub selected_card: usize,
    /// Index of the first card drawn.
    pub scroll_offset: usize,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[ArticleCard] {
        match &self.news {
            NewsPanel::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn selected(&self) -> Option<&ArticleCard> {
        self.cards().get(self.selected_card)
    }

    pub fn select_next(&mut self) {
        if self.selected_card + 1 < self.cards().len() {
            self.selected_card += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_card = self.selected_card.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_card = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_card = self.cards().len().saturating_sub(1);
    }

    fn reset_cursor(&mut self) {
        self.selected_card = 0;
        self.scroll_offset = 0;
    }
}

impl DisplaySurface for DashboardView {
    fn show_placeholder(&mut self, message: &str) {
        self.news = NewsPanel::Placeholder(message.to_string());
        self.reset_cursor();
    }

    fn render_cards(&mut self, cards: Vec<ArticleCard>) {
        self.news = NewsPanel::Cards(cards);
        self.reset_cursor();
    }

    fn clear_cards(&mut self) {
        self.news = NewsPanel::Empty;
        self.reset_cursor();
    }

    fn update_stats(&mut self, stats: ArticleStats) {
        self.stats = stats;
    }

    fn reveal_stats(&mut self) {
        self.stats_visible = true;
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn hide_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::CardLabels;

    fn card(title: &str) -> ArticleCard {
        ArticleCard {
            source: "S".to_string(),
            published: String::new(),
            title: title.to_string(),
            description: String::new(),
            labels: CardLabels::Uncategorized,
            link: "#".to_string(),
        }
    }

    #[test]
    fn test_selection_clamps_to_cards() {
        let mut view = DashboardView::new();
        view.render_cards(vec![card("A"), card("B")]);
        view.select_next();
        view.select_next();
        assert_eq!(view.selected().map(|c| c.title.as_str()), Some("B"));
        view.select_prev();
        view.select_prev();
        assert_eq!(view.selected_card, 0);
    }

    #[test]
    fn test_rerender_resets_cursor() {
        let mut view = DashboardView::new();
        view.render_cards(vec![card("A"), card("B")]);
        view.select_last();
        view.show_placeholder("No articles found");
        assert_eq!(view.selected_card, 0);
        assert!(view.cards().is_empty());
        assert!(view.selected().is_none());
    }

    #[test]
    fn test_error_show_hide() {
        let mut view = DashboardView::new();
        view.show_error("boom");
        assert_eq!(view.error.as_deref(), Some("boom"));
        view.hide_error();
        assert!(view.error.is_none());
    }
}
