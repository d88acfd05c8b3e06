//! Shared helpers for rendering server-provided text.
//!
//! - **Text**: Unicode-aware width, truncation and wrapping; control
//!   character stripping; publish date normalization
//! - **Links**: validation before opening in the system browser

mod text;
mod url_validator;

pub use text::{
    display_width, format_published, strip_control_chars, truncate_to_width, wrap_to_width,
};
pub use url_validator::{validate_link, LinkError};
