//! # Global News
//!
//! A terminal news reader over the NewsAPI service: top headlines for a
//! selected country, or a free-text search across all indexed articles.
//!
//! ## Features
//!
//! - Country selector with fifteen countries, defaulting to the United States
//! - Search that takes precedence over the country while search text is set
//! - Automatic fallback to a global "latest" search when a request comes back
//!   empty, with an advisory banner naming the selected country
//! - Loading indicator, error banner and article cards in text, Markdown or
//!   JSON
//!
//! ## Usage
//!
//! ```sh
//! NEWSAPI_KEY=... global_news
//! global_news --api-key ... --country jp --once
//! ```
//!
//! ## Architecture
//!
//! 1. **Settings**: CLI flags, environment and an optional YAML file
//! 2. **Controller**: owns the UI state and runs fetch → fallback → commit
//! 3. **Session**: reads commands while fetches are in flight, renders on commit

use clap::Parser;
use std::error::Error;
use std::io::Write;
use tokio::io::BufReader;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod controller;
mod error;
mod models;
mod outputs;
mod session;
mod utils;

use api::NewsApiClient;
use cli::Cli;
use config::Settings;
use controller::NewsFetchController;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    run(args).await
}

#[instrument(level = "info", skip_all)]
async fn run(args: Cli) -> Result<(), Box<dyn Error>> {
    let start_time = std::time::Instant::now();
    info!("global_news starting up");
    debug!(?args.config, ?args.format, once = args.once, "Parsed CLI arguments");

    let settings = match Settings::from_cli(&args).await {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(?settings, "Settings resolved");

    let client = NewsApiClient::new(settings.base_url.clone(), settings.api_key.clone())?;
    let controller = NewsFetchController::new(client, settings.country.clone());
    controller.set_query(settings.query.clone());
    debug!(client = ?controller.source(), "Controller ready");

    if settings.once {
        let outcome = controller.fetch_news().await;
        info!(?outcome, "One-shot fetch finished");
        let mut stdout = std::io::stdout().lock();
        writeln!(
            stdout,
            "{}",
            outputs::render(&controller.snapshot(), settings.format)
        )?;
        stdout.flush()?;
    } else {
        let input = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        session::run(&controller, settings.format, input, &mut stdout).await?;
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Session complete");
    Ok(())
}
