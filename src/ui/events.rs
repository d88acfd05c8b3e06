//! Background task event processing.

use crate::app::{App, AppEvent, CategoryLoad};

use super::helpers::{CATEGORIES_TASK, NEWS_FETCH_TASK};

/// Apply one background event to the app.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::CategoriesLoaded(result) => app.apply_categories(result),
        AppEvent::NewsFetched(result) => {
            app.complete_fetch(result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            match task {
                NEWS_FETCH_TASK => {
                    app.abort_fetch(&format!("internal error: {}", error));
                }
                CATEGORIES_TASK => {
                    app.category_load = CategoryLoad::Failed;
                }
                _ => {}
            }
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, NewsClient, NewsResponse};
    use crate::fetcher::FETCH_LABEL;
    use crate::keybindings::KeybindingRegistry;
    use crate::theme::ThemeVariant;
    use std::time::Duration;

    fn test_app() -> App {
        let client = NewsClient::new("http://127.0.0.1:5000", Duration::from_secs(5)).unwrap();
        App::new(client, ThemeVariant::Dark, KeybindingRegistry::new())
    }

    #[tokio::test]
    async fn test_categories_loaded_populates_dropdown() {
        let mut app = test_app();
        handle_app_event(
            &mut app,
            AppEvent::CategoriesLoaded(Ok(vec!["Tech".into(), "Sports".into()])),
        );
        assert_eq!(app.dropdown.option_count(), 2);
        assert_eq!(app.category_load, CategoryLoad::Loaded);
    }

    #[tokio::test]
    async fn test_news_fetched_transport_error_shows_message() {
        let mut app = test_app();
        app.begin_fetch();
        handle_app_event(&mut app, AppEvent::NewsFetched(Err(ApiError::Timeout(30))));
        assert!(app
            .view
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("Error fetching news: ")));
        assert!(app.fetch.is_enabled());
    }

    #[tokio::test]
    async fn test_news_fetched_rejection_keeps_stats_hidden() {
        let mut app = test_app();
        app.begin_fetch();
        handle_app_event(
            &mut app,
            AppEvent::NewsFetched(Ok(NewsResponse {
                success: false,
                articles: None,
                error: Some("rate limited".into()),
                total: None,
            })),
        );
        assert_eq!(app.view.error.as_deref(), Some("rate limited"));
        assert!(!app.view.stats_visible);
        assert!(app.articles.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_panic_releases_control() {
        let mut app = test_app();
        app.begin_fetch();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: NEWS_FETCH_TASK,
                error: "oops".into(),
            },
        );
        assert!(app.fetch.is_enabled());
        assert_eq!(app.fetch.label(), FETCH_LABEL);
        assert!(app.view.error.is_some());
    }

    #[tokio::test]
    async fn test_category_panic_marks_failed() {
        let mut app = test_app();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: CATEGORIES_TASK,
                error: "oops".into(),
            },
        );
        assert_eq!(app.category_load, CategoryLoad::Failed);
        assert!(app.view.error.is_none());
    }
}
