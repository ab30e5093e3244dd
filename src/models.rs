//! Data models for provider responses and UI state.
//!
//! - [`Article`]: one story as returned by the provider, reduced to the fields
//!   the UI reads
//! - [`NewsResponse`]: the response envelope
//! - [`QueryState`]: the five pieces of state owned by the controller
//! - [`COUNTRIES`]: the fixed country selector contents
//!
//! Field names on [`Article`] follow the provider's camelCase JSON, which is
//! why `urlToImage` is renamed rather than the struct being
//! `#[allow(non_snake_case)]`.

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder shown when an article has no description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Countries offered by the selector, as `(code, display name)`.
///
/// Order is the order shown to the user.
pub const COUNTRIES: [(&str, &str); 15] = [
    ("us", "United States"),
    ("in", "India"),
    ("gb", "United Kingdom"),
    ("au", "Australia"),
    ("ca", "Canada"),
    ("jp", "Japan"),
    ("fr", "France"),
    ("de", "Germany"),
    ("ru", "Russia"),
    ("br", "Brazil"),
    ("za", "South Africa"),
    ("ng", "Nigeria"),
    ("kr", "South Korea"),
    ("cn", "China"),
    ("ar", "Argentina"),
];

/// Country selected when the UI mounts.
pub const DEFAULT_COUNTRY: &str = "us";

/// Look up the display name of a selector country.
///
/// Matching is case-insensitive; returns `None` for codes outside the table.
pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// A single news story.
///
/// Every other field the provider sends (author, source, publishedAt, ...)
/// is ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// Headline. `null` or missing reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Short summary; rendered as [`NO_DESCRIPTION`] when absent.
    #[serde(default)]
    pub description: Option<String>,
    /// Link to the full story.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    /// Lead image. Omitted from rendering when absent.
    #[serde(default, rename = "urlToImage")]
    pub url_to_image: Option<String>,
}

impl Article {
    /// Description to display, falling back to the placeholder for absent or
    /// blank descriptions.
    pub fn description_or_placeholder(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => NO_DESCRIPTION,
        }
    }

    /// Image URL to display, if any.
    pub fn image(&self) -> Option<&str> {
        self.url_to_image
            .as_deref()
            .filter(|u| !u.trim().is_empty())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response envelope for both endpoints.
///
/// Only `articles` is read; a body without it is treated as malformed.
#[derive(Debug, Deserialize)]
pub struct NewsResponse {
    pub articles: Vec<Article>,
}

/// Error envelope the provider sends with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ProviderError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// UI state owned by the fetch controller.
///
/// `articles` and `error` are not mutually exclusive: the fallback path sets
/// both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    /// Selected country code.
    pub country: String,
    /// Search text; empty means no search is active.
    pub query: String,
    /// Articles from the last committed successful fetch.
    pub articles: Vec<Article>,
    /// True while the latest triggered fetch is in flight.
    pub loading: bool,
    /// Message for the error banner; empty means no error.
    pub error: String,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            query: String::new(),
            articles: Vec::new(),
            loading: false,
            error: String::new(),
        }
    }
}

impl QueryState {
    /// Whether the next fetch will take the search branch.
    pub fn search_active(&self) -> bool {
        !self.query.is_empty()
    }
}
