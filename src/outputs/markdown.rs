//! Markdown rendering.
//!
//! Cards become level-two sections; the image, when present, is embedded
//! with the title as alt text.

use super::{LOADING, NO_ARTICLES, TITLE, footer, mode_line, shows_articles, shows_empty_notice};
use crate::models::QueryState;
use crate::utils::collapse_whitespace;
use std::fmt::Write;

pub fn render(state: &QueryState) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# {}\n", TITLE);
    let _ = writeln!(md, "_{}_\n", mode_line(state));

    if state.loading {
        let _ = writeln!(md, "{}\n", LOADING);
    }

    if !state.error.is_empty() {
        let _ = writeln!(md, "> **{}**\n", state.error);
    }

    if shows_articles(state) {
        for article in &state.articles {
            let title = collapse_whitespace(&article.title);
            let _ = writeln!(md, "## {}\n", title);
            if let Some(image) = article.image() {
                let _ = writeln!(md, "![{}]({})\n", title, image);
            }
            let _ = writeln!(
                md,
                "{}\n",
                collapse_whitespace(article.description_or_placeholder())
            );
            let _ = writeln!(md, "[Read More]({})\n", article.url);
        }
    }

    if shows_empty_notice(state) {
        let _ = writeln!(md, "{}\n", NO_ARTICLES);
    }

    let _ = writeln!(md, "---\n\n{}", footer());
    md
}
