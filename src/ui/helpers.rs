//! Background task plumbing shared by the UI layer.

use crate::api::NewsClient;
use crate::app::{App, AppEvent};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

pub(super) const CATEGORIES_TASK: &str = "categories";
pub(super) const NEWS_FETCH_TASK: &str = "news_fetch";

/// Wraps a future to catch panics and convert them to errors.
///
/// A panic in a spawned task would otherwise vanish inside the runtime; this
/// turns it into `Err(panic_message)` so the UI can react.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic payload".to_string()
            }
        })
}

/// Send an event to the UI, logging if the loop has already gone away.
async fn send(tx: &mpsc::Sender<AppEvent>, event: AppEvent, name: &'static str) {
    if let Err(e) = tx.send(event).await {
        tracing::warn!(error = %e, event = name, "Channel send failed (receiver dropped)");
    }
}

async fn report_panic(tx: &mpsc::Sender<AppEvent>, task: &'static str, error: String) {
    tracing::error!(task, error = %error, "Background task panicked");
    send(tx, AppEvent::TaskPanicked { task, error }, "TaskPanicked").await;
}

/// Load the category list once. Reports `AppEvent::CategoriesLoaded`.
pub fn spawn_category_load(client: NewsClient, tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        match catch_task_panic(client.fetch_categories()).await {
            Ok(result) => send(&tx, AppEvent::CategoriesLoaded(result), "CategoriesLoaded").await,
            Err(panic_msg) => report_panic(&tx, CATEGORIES_TASK, panic_msg).await,
        }
    });
}

/// Trigger a news fetch.
///
/// Does nothing but post a status notice if one is already in flight.
/// Otherwise the control goes into its loading state and the request runs
/// on a background task that reports `AppEvent::NewsFetched`.
pub fn start_fetch(app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    if !app.begin_fetch() {
        return;
    }

    let client = app.client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        match catch_task_panic(client.fetch_news()).await {
            Ok(result) => send(&tx, AppEvent::NewsFetched(result), "NewsFetched").await,
            Err(panic_msg) => report_panic(&tx, NEWS_FETCH_TASK, panic_msg).await,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catch_task_panic_passes_value_through() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_catch_task_panic_extracts_message() {
        let result = catch_task_panic(async {
            if true {
                panic!("boom");
            }
        })
        .await;
        assert_eq!(result, Err("boom".to_string()));
    }
}
