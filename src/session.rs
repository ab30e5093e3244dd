//! Interactive session: the terminal counterpart of the search box, search
//! button and country dropdown.
//!
//! Input is read line by line while fetches are in flight, so the prompt
//! never blocks on the network. Every fetch that commits re-renders the view;
//! superseded fetches render nothing.
//!
//! # Commands
//!
//! | Command | Effect |
//! |---|---|
//! | `query <text>` | set the search text (no fetch) |
//! | `clear` | clear the search text (no fetch) |
//! | `search [text]` | optionally set the search text, then fetch |
//! | `country <code>` | select a country; fetches when it changes |
//! | `countries` | list selectable countries |
//! | `show` | print the current view again |
//! | `help` | list commands |
//! | `quit`, `exit` | leave |

use crate::api::NewsSource;
use crate::cli::OutputFormat;
use crate::controller::{FetchOutcome, NewsFetchController};
use crate::error::CommandError;
use crate::models::{COUNTRIES, country_name};
use crate::outputs::{self, LOADING};
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use itertools::Itertools;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument};

const HELP: &str = "\
Commands:
  query <text>     set the search text (run `search` to fetch)
  clear            clear the search text
  search [text]    fetch now, optionally setting the search text first
  country <code>   select a country (see `countries`)
  countries        list selectable countries
  show             print the current view again
  help             show this help
  quit             leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    Clear,
    Search(Option<String>),
    Country(String),
    Countries,
    Show,
    Help,
    Quit,
    Empty,
}

/// Parse one line of input.
///
/// Command words are case-insensitive; the search text keeps its case and
/// inner spacing but loses surrounding whitespace.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "query" if rest.is_empty() => Err(CommandError::MissingArgument("query")),
        "query" => Ok(Command::Query(rest.to_string())),
        "clear" => Ok(Command::Clear),
        "search" if rest.is_empty() => Ok(Command::Search(None)),
        "search" => Ok(Command::Search(Some(rest.to_string()))),
        "country" if rest.is_empty() => Err(CommandError::MissingArgument("country")),
        "country" => {
            let code = rest.to_ascii_lowercase();
            match country_name(&code) {
                Some(_) => Ok(Command::Country(code)),
                None => Err(CommandError::UnknownCountry(code)),
            }
        }
        "countries" => Ok(Command::Countries),
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Selector contents, one country per line.
pub fn country_list() -> String {
    COUNTRIES
        .iter()
        .map(|(code, name)| format!("  {code}  {name}"))
        .join("\n")
}

enum Event {
    Fetched(FetchOutcome),
    Line(io::Result<Option<String>>),
}

/// Run the interactive session until `quit` or end of input.
///
/// The mount-time fetch is triggered before the first line is read. At end of
/// input the session waits for fetches still in flight and renders those that
/// commit; `quit` drops them instead.
#[instrument(level = "info", skip_all, fields(?format))]
pub async fn run<S, R, W>(
    controller: &NewsFetchController<S>,
    format: OutputFormat,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    S: NewsSource,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut pending: FuturesUnordered<LocalBoxFuture<'_, FetchOutcome>> = FuturesUnordered::new();
    let mut lines = input.lines();

    pending.push(controller.fetch_news().boxed_local());
    writeln!(out, "{LOADING}")?;
    out.flush()?;

    loop {
        let event = tokio::select! {
            biased;
            Some(outcome) = pending.next(), if !pending.is_empty() => Event::Fetched(outcome),
            line = lines.next_line() => Event::Line(line),
        };

        match event {
            Event::Fetched(outcome) => {
                debug!(?outcome, in_flight = pending.len(), "Fetch finished");
                if outcome.committed() {
                    write_view(controller, format, out)?;
                }
            }
            Event::Line(line) => {
                let Some(line) = line? else {
                    info!(in_flight = pending.len(), "End of input");
                    while let Some(outcome) = pending.next().await {
                        debug!(?outcome, in_flight = pending.len(), "Fetch finished");
                        if outcome.committed() {
                            write_view(controller, format, out)?;
                        }
                    }
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        if let Some(fetch) = apply(controller, command, format, out)? {
                            pending.push(fetch);
                            writeln!(out, "{LOADING}")?;
                        }
                    }
                    Err(e) => writeln!(out, "{e}. Type `help` for commands.")?,
                }
                out.flush()?;
            }
        }
    }

    if !pending.is_empty() {
        info!(in_flight = pending.len(), "Dropping unfinished fetches");
    }
    Ok(())
}

/// Apply a command, returning the fetch it triggered, if any.
fn apply<'a, S, W>(
    controller: &'a NewsFetchController<S>,
    command: Command,
    format: OutputFormat,
    out: &mut W,
) -> io::Result<Option<LocalBoxFuture<'a, FetchOutcome>>>
where
    S: NewsSource,
    W: Write,
{
    let fetch = match command {
        Command::Query(text) => {
            controller.set_query(text);
            writeln!(out, "Search text set. Run `search` to fetch.")?;
            None
        }
        Command::Clear => {
            controller.set_query("");
            writeln!(out, "Search text cleared. Run `search` to fetch headlines.")?;
            None
        }
        Command::Search(text) => {
            if let Some(text) = text {
                controller.set_query(text);
            }
            Some(controller.fetch_news().boxed_local())
        }
        Command::Country(code) => match controller.select_country(&code) {
            Some(fetch) => Some(fetch.boxed_local()),
            None => {
                let name = country_name(&code).unwrap_or(code.as_str());
                writeln!(out, "{name} is already selected.")?;
                None
            }
        },
        Command::Countries => {
            writeln!(out, "{}", country_list())?;
            None
        }
        Command::Show => {
            write_view(controller, format, out)?;
            None
        }
        Command::Help => {
            writeln!(out, "{HELP}")?;
            None
        }
        Command::Quit | Command::Empty => None,
    };
    Ok(fetch)
}

fn write_view<S, W>(
    controller: &NewsFetchController<S>,
    format: OutputFormat,
    out: &mut W,
) -> io::Result<()>
where
    S: NewsSource,
    W: Write,
{
    let state = controller.snapshot();
    writeln!(out, "{}", outputs::render(&state, format))?;
    out.flush()
}
