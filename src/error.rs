//! Error types for the fetch, configuration and input boundaries.
//!
//! Fetch errors never reach the user in detail: the controller collapses every
//! [`FetchError`] into one generic message and only logs the cause.
//! Configuration errors abort startup.

use thiserror::Error;

/// Failure while talking to the news provider.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request URL could not be built from the configured base.
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    /// Connection, TLS or body transfer failure.
    ///
    /// Built through `From`, which strips the request URL: it carries the
    /// API key.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The body was not a news response.
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.without_url())
    }
}

/// Failure while assembling runtime settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no API key configured (use --api-key, NEWSAPI_KEY or api_key in the config file)")]
    MissingApiKey,

    #[error("invalid base url {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unknown country code '{0}'")]
    UnknownCountry(String),
}

/// Rejected line of interactive input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("unknown country code '{0}'")]
    UnknownCountry(String),
}
