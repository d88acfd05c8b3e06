//! News fetch control.
//!
//! Owns the fetch button / loader state and applies a completed
//! `GET /api/news` to the article list. At most one fetch is in flight:
//! [`FetchControl::begin`] refuses a second trigger until the first one
//! completes.

use crate::api::{ApiError, Article, NewsResponse};
use crate::pipeline::{self, DisplaySurface};
use crate::selection::SelectionState;
use crate::util::strip_control_chars;
use std::sync::Arc;

pub const FETCH_LABEL: &str = "Fetch & Classify News";
pub const LOADING_LABEL: &str = "Loading...";
pub const FETCH_FAILED_FALLBACK: &str = "Failed to fetch news";

/// Number of frames in the loading spinner animation.
pub const SPINNER_FRAMES: usize = 10;

/// How a fetch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// `success: true`; the article list was replaced.
    Loaded { count: usize },
    /// `success: false`; the server's message (or the fallback) is shown.
    Rejected { message: String },
    /// Transport or decoding failure.
    Failed { message: String },
}

#[derive(Debug)]
pub struct FetchControl {
    in_flight: bool,
    label: &'static str,
    loader_visible: bool,
    spinner_frame: usize,
}

impl Default for FetchControl {
    fn default() -> Self {
        Self {
            in_flight: false,
            label: FETCH_LABEL,
            loader_visible: false,
            spinner_frame: 0,
        }
    }
}

impl FetchControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the fetch button accepts a trigger.
    pub fn is_enabled(&self) -> bool {
        !self.in_flight
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn loader_visible(&self) -> bool {
        self.loader_visible
    }

    pub fn spinner_frame(&self) -> usize {
        self.spinner_frame
    }

    /// Advance the spinner. Returns true if a redraw is needed.
    pub fn tick(&mut self) -> bool {
        if self.loader_visible {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES;
            true
        } else {
            false
        }
    }

    /// Start a fetch: disable the control, show the loader, hide any error
    /// and clear rendered cards.
    ///
    /// Returns false (and changes nothing) if a fetch is already running;
    /// the caller must not issue a request in that case.
    pub fn begin<S>(&mut self, surface: &mut S) -> bool
    where
        S: DisplaySurface + ?Sized,
    {
        if self.in_flight {
            tracing::debug!("Fetch trigger ignored, request already in flight");
            return false;
        }

        self.in_flight = true;
        self.label = LOADING_LABEL;
        self.loader_visible = true;
        self.spinner_frame = 0;
        surface.hide_error();
        surface.clear_cards();
        tracing::info!("Fetching classified news");
        true
    }

    /// Apply a finished fetch.
    ///
    /// On `success: true` the article list is replaced and re-rendered
    /// under the current selection, and the stats panel is revealed. On
    /// `success: false` or a transport error, a message is shown and
    /// `articles` is left as it was. The control is re-enabled on every
    /// path.
    pub fn complete<S>(
        &mut self,
        result: Result<NewsResponse, ApiError>,
        articles: &mut Arc<Vec<Article>>,
        selection: &SelectionState,
        surface: &mut S,
    ) -> FetchOutcome
    where
        S: DisplaySurface + ?Sized,
    {
        let outcome = match result {
            Ok(envelope) if envelope.success => {
                let fetched = envelope.articles.unwrap_or_default();
                let count = fetched.len();
                *articles = Arc::new(fetched);
                pipeline::render(articles.as_slice(), selection, surface);
                surface.reveal_stats();
                tracing::info!(count, "Fetched classified news");
                FetchOutcome::Loaded { count }
            }
            Ok(envelope) => {
                let message = envelope
                    .error
                    .map(|e| strip_control_chars(&e).into_owned())
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| FETCH_FAILED_FALLBACK.to_string());
                tracing::warn!(error = %message, "Backend reported fetch failure");
                surface.show_error(&message);
                FetchOutcome::Rejected { message }
            }
            Err(e) => {
                tracing::error!(error = %e, "News fetch failed");
                self.show_failure(&e.to_string(), surface)
            }
        };

        self.finish();
        outcome
    }

    /// End an in-flight fetch whose task died before reporting a result.
    ///
    /// Shown like a transport failure; `articles` are untouched.
    pub fn abort<S>(&mut self, reason: &str, surface: &mut S) -> FetchOutcome
    where
        S: DisplaySurface + ?Sized,
    {
        let outcome = self.show_failure(reason, surface);
        self.finish();
        outcome
    }

    fn show_failure<S>(&self, reason: &str, surface: &mut S) -> FetchOutcome
    where
        S: DisplaySurface + ?Sized,
    {
        let message = format!("Error fetching news: {}", strip_control_chars(reason));
        surface.show_error(&message);
        FetchOutcome::Failed { message }
    }

    fn finish(&mut self) {
        self.in_flight = false;
        self.label = FETCH_LABEL;
        self.loader_visible = false;
    }
}
