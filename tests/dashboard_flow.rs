//! End-to-end dashboard flows against a mock backend.
//!
//! Each test starts its own wiremock server, drives `App` the way the UI
//! loop does, and inspects the rendered `DashboardView`.

use newsdash::api::NewsClient;
use newsdash::app::{App, AppEvent, CategoryLoad};
use newsdash::fetcher::{FetchOutcome, FETCH_LABEL};
use newsdash::keybindings::KeybindingRegistry;
use newsdash::pipeline::{CardLabels, NO_ARTICLES_PLACEHOLDER, UNCATEGORIZED_LABEL};
use newsdash::surface::NewsPanel;
use newsdash::theme::ThemeVariant;
use newsdash::ui;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_backend(categories: serde_json::Value, news: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(categories))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/news"))
        .respond_with(news)
        .mount(&server)
        .await;
    server
}

fn app_for(server: &MockServer) -> App {
    let client = NewsClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
    App::new(client, ThemeVariant::Dark, KeybindingRegistry::new())
}

async fn load_categories(app: &mut App) {
    let result = app.client.fetch_categories().await;
    app.apply_categories(result);
}

async fn fetch(app: &mut App) -> FetchOutcome {
    assert!(app.begin_fetch());
    let result = app.client.fetch_news().await;
    app.complete_fetch(result)
}

fn titles(app: &App) -> Vec<String> {
    app.view.cards().iter().map(|c| c.title.clone()).collect()
}

fn two_articles() -> serde_json::Value {
    json!({
        "success": true,
        "total": 2,
        "articles": [
            {
                "source": "BBC",
                "published": "Mon, 01 Jan 2024 12:00:00 GMT",
                "title": "A",
                "description": "About tech",
                "link": "https://bbc.example/a",
                "predicted_labels": ["Tech"]
            },
            {
                "source": "CNN",
                "published": "",
                "title": "B",
                "description": "",
                "link": "https://cnn.example/b",
                "predicted_labels": []
            }
        ]
    })
}

#[tokio::test]
async fn successful_fetch_renders_cards_and_stats() {
    let server = mock_backend(
        json!({"categories": ["Tech", "Sports"]}),
        ResponseTemplate::new(200).set_body_json(two_articles()),
    )
    .await;
    let mut app = app_for(&server);
    load_categories(&mut app).await;

    assert!(!app.view.stats_visible);
    assert_eq!(fetch(&mut app).await, FetchOutcome::Loaded { count: 2 });

    let cards = app.view.cards();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].published, "2024-01-01 12:00");
    assert_eq!(cards[0].labels, CardLabels::Labels(vec!["Tech".to_string()]));
    assert_eq!(cards[1].labels.display(), vec![UNCATEGORIZED_LABEL]);

    assert!(app.view.stats_visible);
    assert_eq!(app.view.stats.total_articles, 2);
    assert_eq!(app.view.stats.categories_found, 1);
    assert_eq!(app.fetch.label(), FETCH_LABEL);
    assert!(!app.fetch.loader_visible());
}

#[tokio::test]
async fn rejected_fetch_shows_server_error() {
    let server = mock_backend(
        json!({"categories": []}),
        ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "rate limited"
        })),
    )
    .await;
    let mut app = app_for(&server);

    let outcome = fetch(&mut app).await;

    assert_eq!(
        outcome,
        FetchOutcome::Rejected {
            message: "rate limited".to_string()
        }
    );
    assert_eq!(app.view.error.as_deref(), Some("rate limited"));
    assert!(app.articles.is_empty());
    assert!(!app.view.stats_visible);
    assert!(app.fetch.is_enabled());
}

#[tokio::test]
async fn server_error_without_envelope_is_a_transport_failure() {
    let server = mock_backend(
        json!({"categories": []}),
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;
    let mut app = app_for(&server);

    fetch(&mut app).await;

    assert_eq!(
        app.view.error.as_deref(),
        Some("Error fetching news: HTTP error: status 500")
    );
    assert_eq!(app.view.news, NewsPanel::Empty);
}

#[tokio::test]
async fn next_fetch_clears_previous_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/news"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "model not loaded"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_articles()))
        .mount(&server)
        .await;
    let mut app = app_for(&server);

    fetch(&mut app).await;
    assert!(app.view.error.is_some());

    assert!(app.begin_fetch());
    assert!(app.view.error.is_none());
    let result = app.client.fetch_news().await;
    app.complete_fetch(result);
    assert_eq!(titles(&app), vec!["A", "B"]);
}

#[tokio::test]
async fn category_failure_is_silent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let mut app = app_for(&server);

    load_categories(&mut app).await;

    assert_eq!(app.category_load, CategoryLoad::Failed);
    assert_eq!(app.dropdown.option_count(), 0);
    assert!(app.view.error.is_none());
}

#[tokio::test]
async fn filtering_follows_the_selection() {
    let server = mock_backend(
        json!({"categories": ["Tech", "Sports"]}),
        ResponseTemplate::new(200).set_body_json(two_articles()),
    )
    .await;
    let mut app = app_for(&server);
    load_categories(&mut app).await;
    fetch(&mut app).await;

    app.toggle_option(0); // Tech
    assert_eq!(titles(&app), vec!["A"]);
    assert_eq!(app.dropdown.summary(), "Tech");

    app.toggle_option(1); // Sports
    assert_eq!(titles(&app), vec!["A"]);
    assert_eq!(app.dropdown.summary(), "2 categories selected");

    app.toggle_option(0);
    assert_eq!(
        app.view.news,
        NewsPanel::Placeholder(NO_ARTICLES_PLACEHOLDER.to_string())
    );
    assert_eq!(app.view.stats.total_articles, 0);
    assert_eq!(app.view.stats.categories_found, 0);

    app.select_all();
    app.clear_all();
    assert!(app.dropdown.selection().is_empty());
    assert_eq!(titles(&app), vec!["A", "B"]);
    assert_eq!(app.dropdown.summary(), "Select categories...");
}

#[tokio::test]
async fn refetch_keeps_active_filter() {
    let server = mock_backend(
        json!({"categories": ["Tech", "Sports"]}),
        ResponseTemplate::new(200).set_body_json(two_articles()),
    )
    .await;
    let mut app = app_for(&server);
    load_categories(&mut app).await;
    fetch(&mut app).await;

    app.toggle_option(0);
    fetch(&mut app).await;

    assert!(app.dropdown.selection().contains("Tech"));
    assert_eq!(titles(&app), vec!["A"]);
    assert_eq!(app.articles.len(), 2);
}

#[tokio::test]
async fn missing_article_fields_use_defaults() {
    let server = mock_backend(
        json!({"categories": []}),
        ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "articles": [{}]
        })),
    )
    .await;
    let mut app = app_for(&server);
    fetch(&mut app).await;

    let card = &app.view.cards()[0];
    assert_eq!(card.title, "No Title");
    assert_eq!(card.source, "Unknown Source");
    assert_eq!(card.link, "#");
    assert_eq!(card.labels, CardLabels::Uncategorized);
    assert!(app.selected_link().is_err());
}

#[tokio::test]
async fn background_tasks_report_over_the_channel() {
    let server = mock_backend(
        json!({"categories": ["Tech"]}),
        ResponseTemplate::new(200)
            .set_body_json(two_articles())
            .set_delay(Duration::from_millis(50)),
    )
    .await;
    let mut app = app_for(&server);
    let (tx, mut rx) = mpsc::channel::<AppEvent>(8);

    ui::spawn_category_load(app.client.clone(), tx.clone());
    ui::start_fetch(&mut app, &tx);
    // Second trigger while the first is outstanding is ignored
    ui::start_fetch(&mut app, &tx);
    assert!(app.fetch.in_flight());

    let mut news_events = 0;
    for _ in 0..2 {
        match tokio::time::timeout(Duration::from_secs(5), rx.recv()).await {
            Ok(Some(AppEvent::CategoriesLoaded(result))) => app.apply_categories(result),
            Ok(Some(AppEvent::NewsFetched(result))) => {
                news_events += 1;
                app.complete_fetch(result);
            }
            Ok(Some(AppEvent::TaskPanicked { task, error })) => {
                panic!("task {} panicked: {}", task, error)
            }
            Ok(None) | Err(_) => panic!("background task did not report"),
        }
    }

    assert_eq!(news_events, 1);
    assert_eq!(app.dropdown.option_count(), 1);
    assert_eq!(titles(&app), vec!["A", "B"]);
    assert!(app.fetch.is_enabled());
    assert_eq!(server.received_requests().await.map_or(0, |r| r.len()), 2);
}
