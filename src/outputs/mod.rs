//! Renderers for the news view.
//!
//! Each renderer turns a [`QueryState`] into a complete view following the
//! same display rules:
//!
//! - the loading indicator shows while a fetch is in flight
//! - the error banner shows whenever `error` is non-empty
//! - article cards show only when not loading and articles exist
//! - the "no articles" notice shows when not loading, with no articles and
//!   no error
//!
//! # Submodules
//!
//! - [`text`]: colored terminal cards
//! - [`markdown`]: a Markdown document
//! - [`json`]: the state serialized as JSON

use crate::cli::OutputFormat;
use crate::models::{QueryState, country_name};

pub mod json;
pub mod markdown;
pub mod text;

pub const TITLE: &str = "Global News Aggregator";
pub const LOADING: &str = "Loading news...";
pub const NO_ARTICLES: &str = "No news articles found.";

/// Render `state` in the requested format.
pub fn render(state: &QueryState, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => text::render(state),
        OutputFormat::Markdown => markdown::render(state),
        OutputFormat::Json => json::render(state),
    }
}

/// One-line description of what the next fetch will request.
pub fn mode_line(state: &QueryState) -> String {
    if state.search_active() {
        format!("Search: \"{}\"", state.query)
    } else {
        let name = country_name(&state.country).unwrap_or("Unknown country");
        format!("Top headlines: {} ({})", name, state.country)
    }
}

pub fn footer() -> String {
    format!(
        "© {} Global News Aggregator. Data from NewsAPI.",
        crate::utils::current_year()
    )
}

/// Whether the view should list article cards.
pub fn shows_articles(state: &QueryState) -> bool {
    !state.loading && !state.articles.is_empty()
}

/// Whether the view should show the "no articles" notice.
pub fn shows_empty_notice(state: &QueryState) -> bool {
    !state.loading && state.articles.is_empty() && state.error.is_empty()
}
