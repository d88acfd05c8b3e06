//! Wire types for the news backend.
//!
//! Field names match the backend's JSON exactly. Missing string fields fall
//! back to the same placeholders the backend itself uses when a feed entry
//! lacks them.

use serde::{Deserialize, Serialize};

fn default_title() -> String {
    "No Title".to_string()
}

fn default_link() -> String {
    "#".to_string()
}

fn default_source() -> String {
    "Unknown Source".to_string()
}

/// A single classified news article.
///
/// Immutable once received. `predicted_labels` may be empty (or absent on
/// the wire) when the classifier produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub published: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_link")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub predicted_labels: Vec<String>,
}

/// `null` and a missing key both mean "no labels".
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Article {
    /// Whether this article carries at least one label.
    pub fn is_categorized(&self) -> bool {
        !self.predicted_labels.is_empty()
    }
}

/// Response body of `GET /api/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Response envelope of `GET /api/news`.
///
/// `success` is the discriminant: when true, `articles` carries the result;
/// when false, `error` may carry a server-provided message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsResponse {
    pub success: bool,
    #[serde(default)]
    pub articles: Option<Vec<Article>>,
    #[serde(default)]
    pub error: Option<String>,
    /// Article count as reported by the backend. Informational only.
    #[serde(default)]
    pub total: Option<usize>,
}
