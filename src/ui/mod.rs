//! Terminal user interface.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard and mouse handling
//! - `events` - Background task event processing
//! - `helpers` - Background task spawning
//! - `render` - Frame layout
//! - `header`, `categories`, `stats`, `articles`, `status`, `help` - widgets

mod articles;
mod categories;
mod events;
mod header;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod stats;
mod status;

pub use helpers::{spawn_category_load, start_fetch};
pub use loop_runner::{run, Action};
