//! newsdash: a terminal dashboard for classified news.
//!
//! Fetches articles from a news-classification backend, renders them as
//! cards and filters them by category through a multi-select dropdown.

pub mod api;
pub mod app;
pub mod config;
pub mod dropdown;
pub mod fetcher;
pub mod keybindings;
pub mod pipeline;
pub mod selection;
pub mod surface;
pub mod theme;
pub mod ui;
pub mod util;
