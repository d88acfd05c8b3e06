//! Backend access for the news dashboard.
//!
//! Two read-only JSON endpoints:
//!
//! - `GET /api/categories` → `{ "categories": [string] }`
//! - `GET /api/news` → `{ "success": bool, "articles"?: [Article], "error"?: string }`
//!
//! - [`types`] - serde wire types ([`Article`], [`NewsResponse`])
//! - [`client`] - the reqwest-backed [`NewsClient`]

mod client;
mod types;

pub use client::{parse_base_url, ApiError, NewsClient};
pub use types::{Article, CategoriesResponse, NewsResponse};
