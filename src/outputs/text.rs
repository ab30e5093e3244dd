//! Terminal rendering.

use super::{LOADING, NO_ARTICLES, TITLE, footer, mode_line, shows_articles, shows_empty_notice};
use crate::models::{Article, QueryState};
use crate::utils::collapse_whitespace;
use colored::Colorize;
use std::fmt::Write;

/// Render the whole view as colored text.
pub fn render(state: &QueryState) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", TITLE.bold());
    let _ = writeln!(out, "{}\n", mode_line(state).as_str().dimmed());

    if state.loading {
        let _ = writeln!(out, "{}\n", LOADING.cyan());
    }

    if !state.error.is_empty() {
        let _ = writeln!(out, "{}\n", state.error.as_str().red().bold());
    }

    if shows_articles(state) {
        for (i, article) in state.articles.iter().enumerate() {
            write_card(&mut out, i + 1, article);
        }
    }

    if shows_empty_notice(state) {
        let _ = writeln!(out, "{}\n", NO_ARTICLES);
    }

    let _ = writeln!(out, "{}", footer().as_str().dimmed());
    out
}

fn write_card(out: &mut String, index: usize, article: &Article) {
    let title = if article.title.is_empty() {
        "(untitled)".to_string()
    } else {
        collapse_whitespace(&article.title)
    };
    let _ = writeln!(out, "{:>3}. {}", index, title.as_str().bold());
    if let Some(image) = article.image() {
        let _ = writeln!(out, "     {} {}", "image:".dimmed(), image);
    }
    let _ = writeln!(
        out,
        "     {}",
        collapse_whitespace(article.description_or_placeholder())
    );
    let _ = writeln!(out, "     {} {}\n", "Read more:".blue(), article.url);
}
