//! The news fetch controller.
//!
//! Owns [`QueryState`] and runs the fetch sequence:
//!
//! ```text
//! Idle → Loading → Success
//!                → SuccessEmpty → FallbackLoading → FallbackSuccess | FallbackFailure
//!                → Failure
//!      → Idle
//! ```
//!
//! # Generations
//!
//! Fetches are not cancelled. Each triggered fetch instead takes a generation
//! number and a snapshot of its parameters at trigger time, and on resolution
//! commits only if it is still the newest. Older fetches that resolve late are
//! reported as [`FetchOutcome::Superseded`] and leave state untouched,
//! including `loading`, which belongs to the newer fetch.
//!
//! The trigger phase runs synchronously inside [`NewsFetchController::fetch_news`]
//! before the returned future is first polled, so trigger order always equals
//! generation order.

use crate::api::{NewsRequest, NewsSource};
use crate::error::FetchError;
use crate::models::{Article, QueryState};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Banner text for any request failure.
pub const FAILURE_MESSAGE: &str = "Failed to load news. Please try again.";

/// Banner text shown alongside fallback results.
pub fn fallback_message(country: &str) -> String {
    format!("No news found for the selected country ({country}). Showing global news.")
}

/// How a single fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Primary request returned articles.
    Loaded { count: usize },
    /// Primary request was empty; fallback results were committed.
    Fallback { count: usize },
    /// Primary or fallback request failed; articles were left as they were.
    Failed,
    /// A newer fetch was triggered before this one resolved; nothing committed.
    Superseded,
}

impl FetchOutcome {
    /// Whether this fetch wrote to state.
    pub fn committed(&self) -> bool {
        !matches!(self, FetchOutcome::Superseded)
    }
}

/// Parameters captured when a fetch is triggered.
#[derive(Debug)]
struct Ticket {
    generation: u64,
    request: NewsRequest,
    country: String,
}

enum Resolved {
    Primary(Vec<Article>),
    Fallback(Vec<Article>),
}

struct Inner {
    state: QueryState,
    generation: u64,
}

/// Owns the UI state and the fetch/fallback sequence.
pub struct NewsFetchController<S> {
    source: S,
    inner: Mutex<Inner>,
}

impl<S> NewsFetchController<S>
where
    S: NewsSource,
{
    /// Create a controller with default state and the given country selected.
    pub fn new(source: S, country: impl Into<String>) -> Self {
        let state = QueryState {
            country: country.into(),
            ..QueryState::default()
        };
        Self {
            source,
            inner: Mutex::new(Inner {
                state,
                generation: 0,
            }),
        }
    }

    // Poisoning is ignored; every commit rewrites the fields it owns.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The source fetches are issued against.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> QueryState {
        self.lock().state.clone()
    }

    /// Update the search text. Never fetches.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        debug!(%query, "Query updated");
        self.lock().state.query = query;
    }

    /// Select a country, fetching if it differs from the current one.
    ///
    /// The fetch uses the current query, so with a search active the country
    /// change does not alter the request.
    ///
    /// # Arguments
    ///
    /// * `country` - Lowercase country code; not checked against the selector
    ///
    /// # Returns
    ///
    /// The triggered fetch (see [`Self::fetch_news`]), or `None` when the
    /// country is unchanged.
    pub fn select_country<'a>(
        &'a self,
        country: &str,
    ) -> Option<impl Future<Output = FetchOutcome> + use<'a, S>> {
        {
            let mut inner = self.lock();
            if inner.state.country == country {
                debug!(country, "Country unchanged; not fetching");
                return None;
            }
            inner.state.country = country.to_string();
        }
        info!(country, "Country changed");
        Some(self.fetch_news())
    }

    /// Trigger a fetch with the current query and country.
    ///
    /// Loading, generation and request parameters are set before this
    /// returns; the returned future performs the network calls and commits.
    ///
    /// # Behavior
    ///
    /// - non-empty query: search request, otherwise headlines for the country
    /// - non-empty result: articles replaced, error cleared
    /// - empty result: one fallback search for `latest`; its articles are
    ///   committed (even if empty) with [`fallback_message`] as the error
    /// - any failure: error set to [`FAILURE_MESSAGE`], articles kept
    /// - `loading` cleared on every path, unless a newer fetch was triggered
    ///   meanwhile, in which case nothing is committed
    ///
    /// # Returns
    ///
    /// A future resolving to the [`FetchOutcome`] of this fetch.
    pub fn fetch_news<'a>(&'a self) -> impl Future<Output = FetchOutcome> + use<'a, S> {
        let ticket = self.begin();
        self.complete(ticket)
    }

    fn begin(&self) -> Ticket {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state.loading = true;
        let ticket = Ticket {
            generation: inner.generation,
            request: NewsRequest::for_state(&inner.state.query, &inner.state.country),
            country: inner.state.country.clone(),
        };
        debug!(generation = ticket.generation, request = %ticket.request, "Fetch triggered");
        ticket
    }

    #[instrument(level = "info", skip_all, fields(generation = ticket.generation, request = %ticket.request))]
    async fn complete(&self, ticket: Ticket) -> FetchOutcome {
        let result = self.resolve(&ticket.request).await;

        let mut inner = self.lock();
        if inner.generation != ticket.generation {
            info!(latest = inner.generation, "Discarding result of superseded fetch");
            return FetchOutcome::Superseded;
        }

        let outcome = match result {
            Ok(Resolved::Primary(articles)) => {
                let count = articles.len();
                inner.state.articles = articles;
                inner.state.error.clear();
                FetchOutcome::Loaded { count }
            }
            Ok(Resolved::Fallback(articles)) => {
                let count = articles.len();
                inner.state.articles = articles;
                inner.state.error = fallback_message(&ticket.country);
                FetchOutcome::Fallback { count }
            }
            Err(e) => {
                warn!(error = %e, "Fetch failed; keeping previous articles");
                inner.state.error = FAILURE_MESSAGE.to_string();
                FetchOutcome::Failed
            }
        };
        inner.state.loading = false;

        info!(?outcome, "Fetch committed");
        outcome
    }

    async fn resolve(&self, request: &NewsRequest) -> Result<Resolved, FetchError> {
        let articles = self.source.fetch(request).await?;
        if !articles.is_empty() {
            return Ok(Resolved::Primary(articles));
        }

        let fallback = NewsRequest::fallback();
        info!(request = %request, fallback = %fallback, "No articles; issuing fallback request");
        let articles = self.source.fetch(&fallback).await?;
        Ok(Resolved::Fallback(articles))
    }
}
