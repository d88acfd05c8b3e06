use crate::api::{ApiError, Article, NewsClient, NewsResponse};
use crate::dropdown::Dropdown;
use crate::fetcher::{FetchControl, FetchOutcome};
use crate::keybindings::{Context, KeybindingRegistry};
use crate::pipeline::{self, ArticleStats};
use crate::surface::DashboardView;
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::{validate_link, LinkError};
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::time::Instant;
use url::Url;

/// Status notice for a fetch trigger that arrives mid-request.
pub const FETCH_IN_PROGRESS: &str = "Fetch already in progress";

/// How long a status message stays up.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Events
// ============================================================================

/// Events from background tasks
pub enum AppEvent {
    /// `GET /api/categories` finished.
    CategoriesLoaded(Result<Vec<String>, ApiError>),
    /// `GET /api/news` finished.
    NewsFetched(Result<NewsResponse, ApiError>),
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked ("categories", "news_fetch")
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

/// Progress of the one-shot category load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryLoad {
    Pending,
    Loaded,
    Failed,
}

// ============================================================================
// Mouse Hit Regions
// ============================================================================

/// Clickable element under a mouse position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    FetchButton,
    Trigger,
    SelectAll,
    ClearAll,
    /// Option row, by option index.
    Option(usize),
    /// Inside the open dropdown but on nothing clickable.
    DropdownPanel,
    /// "Read more" line of a card, by card index.
    CardLink(usize),
    Card(usize),
}

/// Screen rectangles recorded by the last render, for mouse hit-testing.
#[derive(Debug, Default, Clone)]
pub struct ScreenRegions {
    pub fetch_button: Rect,
    pub trigger: Rect,
    /// Bounds of the option list overlay; `None` while closed.
    pub dropdown_panel: Option<Rect>,
    pub select_all: Rect,
    pub clear_all: Rect,
    pub options: Vec<(Rect, usize)>,
    pub cards: Vec<(Rect, usize)>,
    pub card_links: Vec<(Rect, usize)>,
}

impl ScreenRegions {
    /// Topmost target at (`column`, `row`). The dropdown overlay is checked
    /// before anything it covers.
    pub fn hit(&self, column: u16, row: u16) -> Option<HitTarget> {
        let pos = Position::new(column, row);
        let find = |rects: &[(Rect, usize)]| {
            rects
                .iter()
                .find(|(rect, _)| rect.contains(pos))
                .map(|(_, i)| *i)
        };

        if let Some(panel) = self.dropdown_panel {
            if panel.contains(pos) {
                if self.select_all.contains(pos) {
                    return Some(HitTarget::SelectAll);
                }
                if self.clear_all.contains(pos) {
                    return Some(HitTarget::ClearAll);
                }
                return Some(find(&self.options).map_or(HitTarget::DropdownPanel, HitTarget::Option));
            }
        }

        if self.trigger.contains(pos) {
            return Some(HitTarget::Trigger);
        }
        if self.fetch_button.contains(pos) {
            return Some(HitTarget::FetchButton);
        }
        if let Some(i) = find(&self.card_links) {
            return Some(HitTarget::CardLink(i));
        }
        find(&self.cards).map(HitTarget::Card)
    }
}

/// Work a click asks for that `App` cannot do by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickCommand {
    StartFetch,
    OpenLink(usize),
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub client: NewsClient,

    // Theme
    pub theme_variant: ThemeVariant,
    /// Active style map for all UI rendering.
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // Data
    /// Every article from the last successful fetch. Replaced wholesale,
    /// never edited in place.
    pub articles: Arc<Vec<Article>>,
    pub category_load: CategoryLoad,

    // Controllers
    pub dropdown: Dropdown,
    pub fetch: FetchControl,
    pub view: DashboardView,

    // UI State
    pub show_help: bool,
    pub help_scroll_offset: usize,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Cards that fit in the list at the last render.
    pub cards_per_page: usize,
    pub regions: ScreenRegions,

    /// Set whenever state changes; cleared after each draw.
    pub needs_redraw: bool,
}

impl App {
    pub fn new(
        client: NewsClient,
        theme_variant: ThemeVariant,
        keybindings: KeybindingRegistry,
    ) -> Self {
        Self {
            client,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            theme_variant,
            keybindings,
            articles: Arc::new(Vec::new()),
            category_load: CategoryLoad::Pending,
            dropdown: Dropdown::new(),
            fetch: FetchControl::new(),
            view: DashboardView::new(),
            show_help: false,
            help_scroll_offset: 0,
            status_message: None,
            cards_per_page: 1,
            regions: ScreenRegions::default(),
            needs_redraw: true,
        }
    }

    /// Resolve a theme role to a style.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn cycle_theme(&mut self) {
        self.theme_variant = self.theme_variant.next();
        self.theme = StyleMap::from_palette(&self.theme_variant.palette());
        self.set_status(format!("Theme: {}", self.theme_variant.name()));
    }

    /// Keybinding context for the current state.
    pub fn input_context(&self) -> Context {
        if self.dropdown.is_open() {
            Context::Dropdown
        } else {
            Context::Global
        }
    }

    // ------------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------------

    /// Populate the dropdown from the categories response.
    ///
    /// A failure is logged and leaves the dropdown empty; nothing is shown
    /// in the error region.
    pub fn apply_categories(&mut self, result: Result<Vec<String>, ApiError>) {
        match result {
            Ok(categories) => {
                tracing::info!(count = categories.len(), "Loaded categories");
                if self.dropdown.set_options(categories) {
                    self.refilter();
                }
                self.category_load = CategoryLoad::Loaded;
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading categories");
                self.category_load = CategoryLoad::Failed;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------------

    /// Re-derive the displayed cards and stats from the current articles and
    /// selection.
    pub fn refilter(&mut self) -> ArticleStats {
        pipeline::render(
            self.articles.as_slice(),
            self.dropdown.selection(),
            &mut self.view,
        )
    }

    /// Toggle the option at `index` and re-filter.
    pub fn toggle_option(&mut self, index: usize) -> Option<bool> {
        let checked = self.dropdown.toggle_option(index)?;
        self.refilter();
        Some(checked)
    }

    pub fn toggle_highlighted(&mut self) -> Option<bool> {
        self.toggle_option(self.dropdown.cursor())
    }

    pub fn select_all(&mut self) {
        self.dropdown.select_all();
        self.refilter();
    }

    pub fn clear_all(&mut self) {
        self.dropdown.clear_all();
        self.refilter();
    }

    // ------------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------------

    /// Put the fetch control into its loading state.
    ///
    /// Returns false if a fetch is already running; the caller must not
    /// start another request.
    pub fn begin_fetch(&mut self) -> bool {
        if self.fetch.begin(&mut self.view) {
            true
        } else {
            self.set_status(FETCH_IN_PROGRESS);
            false
        }
    }

    pub fn complete_fetch(&mut self, result: Result<NewsResponse, ApiError>) -> FetchOutcome {
        let outcome = self.fetch.complete(
            result,
            &mut self.articles,
            self.dropdown.selection(),
            &mut self.view,
        );
        if let FetchOutcome::Loaded { count } = &outcome {
            self.set_status(format!("Fetched {} articles", count));
        }
        outcome
    }

    /// Release a fetch whose task died without reporting.
    pub fn abort_fetch(&mut self, reason: &str) -> Option<FetchOutcome> {
        self.fetch
            .in_flight()
            .then(|| self.fetch.abort(reason, &mut self.view))
    }

    // ------------------------------------------------------------------------
    // Cards
    // ------------------------------------------------------------------------

    /// Validated link of the card at `index`.
    pub fn link_for_card(&self, index: usize) -> Result<Url, LinkError> {
        let card = self.view.cards().get(index).ok_or(LinkError::Missing)?;
        validate_link(&card.link)
    }

    pub fn selected_link(&self) -> Result<Url, LinkError> {
        self.link_for_card(self.view.selected_card)
    }

    pub fn page_down(&mut self) {
        for _ in 0..self.cards_per_page.max(1) {
            self.view.select_next();
        }
    }

    pub fn page_up(&mut self) {
        for _ in 0..self.cards_per_page.max(1) {
            self.view.select_prev();
        }
    }

    // ------------------------------------------------------------------------
    // Mouse
    // ------------------------------------------------------------------------

    /// Handle a left click at (`column`, `row`).
    ///
    /// While the dropdown is open, clicks inside it act on it; a click
    /// anywhere else closes it and then falls through to whatever is under
    /// the pointer.
    pub fn click(&mut self, column: u16, row: u16) -> Option<ClickCommand> {
        let target = self.regions.hit(column, row);

        if self.dropdown.is_open() {
            match target {
                Some(HitTarget::Trigger) => {
                    self.dropdown.click_trigger();
                    return None;
                }
                Some(HitTarget::SelectAll) => {
                    self.select_all();
                    return None;
                }
                Some(HitTarget::ClearAll) => {
                    self.clear_all();
                    return None;
                }
                Some(HitTarget::Option(i)) => {
                    self.toggle_option(i);
                    return None;
                }
                Some(HitTarget::DropdownPanel) => return None,
                _ => {
                    self.dropdown.click_outside();
                }
            }
        }

        match target? {
            HitTarget::Trigger => {
                self.dropdown.click_trigger();
                None
            }
            HitTarget::FetchButton => Some(ClickCommand::StartFetch),
            HitTarget::CardLink(i) => {
                self.view.selected_card = i;
                Some(ClickCommand::OpenLink(i))
            }
            HitTarget::Card(i) => {
                self.view.selected_card = i;
                None
            }
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    /// Set status message (auto-expires after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message if it has expired. Returns true if cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FETCH_LABEL, LOADING_LABEL};
    use crate::pipeline::NO_ARTICLES_PLACEHOLDER;
    use crate::surface::NewsPanel;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::time;

    fn test_app() -> App {
        let client = NewsClient::new("http://127.0.0.1:5000", Duration::from_secs(5)).unwrap();
        App::new(client, ThemeVariant::Dark, KeybindingRegistry::new())
    }

    fn article(title: &str, labels: &[&str]) -> Article {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "predicted_labels": labels,
            "link": format!("https://news.example.com/{}", title),
        }))
        .unwrap()
    }

    fn loaded_app() -> App {
        let mut app = test_app();
        app.apply_categories(Ok(vec!["Tech".into(), "Sports".into(), "World".into()]));
        app.begin_fetch();
        app.complete_fetch(Ok(NewsResponse {
            success: true,
            articles: Some(vec![
                article("A", &["Tech"]),
                article("B", &["Sports"]),
                article("C", &[]),
            ]),
            error: None,
            total: Some(3),
        }));
        app
    }

    fn titles(app: &App) -> Vec<&str> {
        app.view.cards().iter().map(|c| c.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_category_failure_leaves_dropdown_empty() {
        let mut app = test_app();
        app.apply_categories(Err(ApiError::HttpStatus(500)));
        assert_eq!(app.category_load, CategoryLoad::Failed);
        assert_eq!(app.dropdown.option_count(), 0);
        assert!(app.view.error.is_none());
    }

    #[tokio::test]
    async fn test_toggle_filters_cards() {
        let mut app = loaded_app();
        assert_eq!(titles(&app), vec!["A", "B", "C"]);

        assert_eq!(app.toggle_option(0), Some(true));
        assert_eq!(titles(&app), vec!["A"]);
        assert_eq!(app.view.stats.total_articles, 1);

        assert_eq!(app.toggle_option(0), Some(false));
        assert_eq!(titles(&app), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_reloaded_categories_drop_stale_selection_and_refilter() {
        let mut app = loaded_app();
        app.toggle_option(0);
        assert_eq!(titles(&app), vec!["A"]);

        // "Tech" is no longer offered, so the selection empties and every
        // article is shown again
        app.apply_categories(Ok(vec!["Sports".into(), "World".into()]));
        assert!(app.dropdown.selection().is_empty());
        assert_eq!(titles(&app), vec!["A", "B", "C"]);
        assert_eq!(app.view.stats.total_articles, 3);
    }

    #[tokio::test]
    async fn test_reloaded_categories_keep_live_selection() {
        let mut app = loaded_app();
        app.toggle_option(1);
        app.apply_categories(Ok(vec!["Sports".into()]));
        assert!(app.dropdown.selection().contains("Sports"));
        assert_eq!(titles(&app), vec!["B"]);
    }

    #[tokio::test]
    async fn test_select_all_then_clear_all() {
        let mut app = loaded_app();
        app.select_all();
        assert_eq!(app.dropdown.selection().len(), 3);
        // Uncategorized articles never match a non-empty selection
        assert_eq!(titles(&app), vec!["A", "B"]);

        app.clear_all();
        assert!(app.dropdown.selection().is_empty());
        assert_eq!(titles(&app), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_filter_with_no_match_shows_placeholder() {
        let mut app = loaded_app();
        app.toggle_option(2); // World
        assert_eq!(
            app.view.news,
            NewsPanel::Placeholder(NO_ARTICLES_PLACEHOLDER.to_string())
        );
        assert_eq!(app.view.stats.total_articles, 0);
    }

    #[tokio::test]
    async fn test_second_fetch_trigger_sets_notice() {
        let mut app = test_app();
        assert!(app.begin_fetch());
        assert_eq!(app.fetch.label(), LOADING_LABEL);
        assert!(!app.begin_fetch());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, FETCH_IN_PROGRESS);
    }

    #[tokio::test]
    async fn test_abort_only_when_in_flight() {
        let mut app = test_app();
        assert!(app.abort_fetch("boom").is_none());
        app.begin_fetch();
        assert!(app.abort_fetch("boom").is_some());
        assert_eq!(app.fetch.label(), FETCH_LABEL);
        assert_eq!(app.view.error.as_deref(), Some("Error fetching news: boom"));
    }

    #[tokio::test]
    async fn test_selected_link_validates() {
        let mut app = loaded_app();
        assert_eq!(
            app.selected_link().unwrap().as_str(),
            "https://news.example.com/A"
        );
        app.articles = Arc::new(vec![serde_json::from_value(serde_json::json!({})).unwrap()]);
        app.refilter();
        assert!(matches!(app.selected_link(), Err(LinkError::Missing)));
    }

    #[tokio::test]
    async fn test_cycle_theme() {
        let mut app = test_app();
        app.cycle_theme();
        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert_eq!(app.style("status_bar"), ThemeVariant::Light.palette().status_bar);
    }

    #[tokio::test]
    async fn test_input_context_follows_dropdown() {
        let mut app = test_app();
        assert_eq!(app.input_context(), Context::Global);
        app.dropdown.click_trigger();
        assert_eq!(app.input_context(), Context::Dropdown);
    }

    fn regions() -> ScreenRegions {
        ScreenRegions {
            fetch_button: Rect::new(1, 1, 25, 1),
            trigger: Rect::new(40, 1, 30, 1),
            dropdown_panel: Some(Rect::new(40, 2, 30, 6)),
            select_all: Rect::new(41, 3, 12, 1),
            clear_all: Rect::new(55, 3, 11, 1),
            options: vec![
                (Rect::new(41, 4, 28, 1), 0),
                (Rect::new(41, 5, 28, 1), 1),
                (Rect::new(41, 6, 28, 1), 2),
            ],
            cards: vec![(Rect::new(1, 10, 100, 7), 0), (Rect::new(1, 17, 100, 7), 1)],
            card_links: vec![(Rect::new(1, 15, 100, 1), 0), (Rect::new(1, 22, 100, 1), 1)],
        }
    }

    #[test]
    fn test_hit_prefers_overlay() {
        let r = regions();
        assert_eq!(r.hit(45, 4), Some(HitTarget::Option(0)));
        assert_eq!(r.hit(42, 3), Some(HitTarget::SelectAll));
        assert_eq!(r.hit(56, 3), Some(HitTarget::ClearAll));
        assert_eq!(r.hit(40, 2), Some(HitTarget::DropdownPanel));
        assert_eq!(r.hit(45, 1), Some(HitTarget::Trigger));
        assert_eq!(r.hit(2, 1), Some(HitTarget::FetchButton));
        assert_eq!(r.hit(5, 15), Some(HitTarget::CardLink(0)));
        assert_eq!(r.hit(5, 18), Some(HitTarget::Card(1)));
        assert_eq!(r.hit(200, 200), None);
    }

    #[tokio::test]
    async fn test_click_trigger_opens_and_option_toggles() {
        let mut app = loaded_app();
        app.regions = regions();

        assert_eq!(app.click(45, 1), None);
        assert!(app.dropdown.is_open());

        assert_eq!(app.click(45, 5), None); // Sports
        assert!(app.dropdown.selection().contains("Sports"));
        assert_eq!(titles(&app), vec!["B"]);
        assert!(app.dropdown.is_open());

        assert_eq!(app.click(45, 1), None);
        assert!(!app.dropdown.is_open());
    }

    #[tokio::test]
    async fn test_outside_click_closes_and_falls_through() {
        let mut app = loaded_app();
        app.regions = regions();
        app.dropdown.click_trigger();

        assert_eq!(app.click(2, 1), Some(ClickCommand::StartFetch));
        assert!(!app.dropdown.is_open());
    }

    #[tokio::test]
    async fn test_click_link_selects_card() {
        let mut app = loaded_app();
        app.regions = regions();
        assert_eq!(app.click(3, 22), Some(ClickCommand::OpenLink(1)));
        assert_eq!(app.view.selected_card, 1);
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
