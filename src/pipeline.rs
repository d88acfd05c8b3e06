//! Filter/render pipeline.
//!
//! Derives the displayed articles from the full list and the current
//! selection, turns them into cards, and pushes cards plus aggregate stats
//! to a [`DisplaySurface`]. Inputs are only ever borrowed immutably.

use crate::api::Article;
use crate::selection::SelectionState;
use crate::util::{format_published, strip_control_chars};
use std::collections::HashSet;

pub const NO_ARTICLES_PLACEHOLDER: &str = "No articles found";
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Aggregates over the currently displayed articles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticleStats {
    pub total_articles: usize,
    /// Distinct labels across all displayed articles.
    pub categories_found: usize,
}

/// Label row of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardLabels {
    Labels(Vec<String>),
    /// No labels were predicted; rendered as a single placeholder label.
    Uncategorized,
}

impl CardLabels {
    /// Labels as displayed, with the placeholder substituted when empty.
    pub fn display(&self) -> Vec<&str> {
        match self {
            CardLabels::Labels(labels) => labels.iter().map(String::as_str).collect(),
            CardLabels::Uncategorized => vec![UNCATEGORIZED_LABEL],
        }
    }
}

/// Display-ready view of one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCard {
    pub source: String,
    pub published: String,
    pub title: String,
    pub description: String,
    pub labels: CardLabels,
    /// Outbound link, opened in the system browser.
    pub link: String,
}

impl ArticleCard {
    pub fn from_article(article: &Article) -> Self {
        let labels = if !article.is_categorized() {
            CardLabels::Uncategorized
        } else {
            CardLabels::Labels(
                article
                    .predicted_labels
                    .iter()
                    .map(|l| strip_control_chars(l).into_owned())
                    .collect(),
            )
        };

        Self {
            source: strip_control_chars(&article.source).into_owned(),
            published: format_published(&article.published),
            title: strip_control_chars(&article.title).into_owned(),
            description: strip_control_chars(&article.description).into_owned(),
            labels,
            link: article.link.trim().to_string(),
        }
    }
}

/// Render target for the pipeline and the news fetcher.
///
/// The terminal UI implements this with an in-memory view model; tests use
/// a recording implementation.
pub trait DisplaySurface {
    /// Replace any cards with a single centered message.
    fn show_placeholder(&mut self, message: &str);
    /// Replace the card list.
    fn render_cards(&mut self, cards: Vec<ArticleCard>);
    /// Remove all cards without showing a placeholder.
    fn clear_cards(&mut self);
    fn update_stats(&mut self, stats: ArticleStats);
    /// Make the stats panel visible. It starts hidden.
    fn reveal_stats(&mut self);
    fn show_error(&mut self, message: &str);
    fn hide_error(&mut self);
}

/// Articles visible under `selection`, in their original order.
///
/// An empty selection shows everything; otherwise an article is shown when
/// at least one of its labels is selected. Unlabelled articles are hidden
/// by any non-empty selection.
pub fn filter_articles<'a>(all: &'a [Article], selection: &SelectionState) -> Vec<&'a Article> {
    if selection.is_empty() {
        return all.iter().collect();
    }
    all.iter()
        .filter(|a| selection.matches_any(&a.predicted_labels))
        .collect()
}

pub fn compute_stats(displayed: &[&Article]) -> ArticleStats {
    let labels: HashSet<&str> = displayed
        .iter()
        .flat_map(|a| a.predicted_labels.iter().map(String::as_str))
        .collect();

    ArticleStats {
        total_articles: displayed.len(),
        categories_found: labels.len(),
    }
}

/// Run the whole pipeline: filter, render cards (or the placeholder), and
/// update stats. Returns the stats that were pushed.
pub fn render<S>(all: &[Article], selection: &SelectionState, surface: &mut S) -> ArticleStats
where
    S: DisplaySurface + ?Sized,
{
    let displayed = filter_articles(all, selection);
    let stats = compute_stats(&displayed);

    if displayed.is_empty() {
        surface.show_placeholder(NO_ARTICLES_PLACEHOLDER);
    } else {
        let cards = displayed.iter().map(|a| ArticleCard::from_article(a)).collect();
        surface.render_cards(cards);
    }
    surface.update_stats(stats);

    tracing::debug!(
        total = all.len(),
        displayed = stats.total_articles,
        categories = stats.categories_found,
        selected = selection.len(),
        "Rendered articles"
    );

    stats
}
