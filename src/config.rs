//! Runtime settings.
//!
//! Values are layered, highest priority first:
//!
//! 1. command-line flags (and their environment variables, via `clap`)
//! 2. the YAML file named by `--config`
//! 3. built-in defaults
//!
//! The API key has no default: it must be injected at runtime.
//!
//! # Config file
//!
//! ```yaml
//! api_key: "0123456789abcdef"
//! base_url: "https://newsapi.org/"
//! country: "gb"
//! ```

use crate::api::DEFAULT_BASE_URL;
use crate::cli::{Cli, OutputFormat};
use crate::error::ConfigError;
use crate::models::{DEFAULT_COUNTRY, country_name};
use serde::Deserialize;
use std::fmt;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

/// Contents of the optional YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub country: Option<String>,
}

/// Load and parse a config file.
///
/// An empty file is the same as a file with no keys.
///
/// # Arguments
///
/// * `path` - Path to a YAML file with any of `api_key`, `base_url`, `country`
///
/// # Errors
///
/// [`ConfigError::Read`] if the file cannot be read, [`ConfigError::Parse`]
/// if it is not valid YAML of that shape.
#[instrument(level = "info")]
pub async fn load_file(path: &str) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
    let config = serde_yaml::from_str::<Option<FileConfig>>(&raw)
        .map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?
        .unwrap_or_default();
    info!("Loaded config file");
    Ok(config)
}

/// Fully resolved settings.
pub struct Settings {
    pub api_key: String,
    pub base_url: Url,
    pub country: String,
    pub query: String,
    pub format: OutputFormat,
    pub once: bool,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("country", &self.country)
            .field("query", &self.query)
            .field("format", &self.format)
            .field("once", &self.once)
            .finish()
    }
}

impl Settings {
    /// Build settings from parsed arguments, reading `--config` if given.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`load_file`] or [`Settings::resolve`].
    pub async fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => load_file(path).await?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    /// Merge arguments over file values over defaults, then validate.
    ///
    /// # Arguments
    ///
    /// * `cli` - Parsed arguments; environment variables are already folded in
    /// * `file` - Contents of the config file, or [`FileConfig::default`]
    ///
    /// # Returns
    ///
    /// The resolved settings with the API key trimmed, the base URL ending in
    /// `/` and the country lowercased.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingApiKey`] if no source provides a non-blank key
    /// - [`ConfigError::InvalidBaseUrl`] if the base URL does not parse
    /// - [`ConfigError::UnknownCountry`] if the country is not selectable
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let api_key = cli
            .api_key
            .clone()
            .or(file.api_key)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = parse_base_url(
            cli.base_url
                .as_deref()
                .or(file.base_url.as_deref())
                .unwrap_or(DEFAULT_BASE_URL),
        )?;

        let country = validate_country(
            cli.country
                .as_deref()
                .or(file.country.as_deref())
                .unwrap_or(DEFAULT_COUNTRY),
        )?;

        let settings = Self {
            api_key,
            base_url,
            country,
            query: cli.query.clone().unwrap_or_default(),
            format: cli.format,
            once: cli.once,
        };
        debug!(?settings, "Resolved settings");
        Ok(settings)
    }
}

/// Parse a provider base URL, making sure it ends in `/` so endpoint paths
/// resolve beneath it rather than replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Normalize a selector country code, rejecting codes outside the table.
pub fn validate_country(code: &str) -> Result<String, ConfigError> {
    let code = code.trim().to_ascii_lowercase();
    match country_name(&code) {
        Some(_) => Ok(code),
        None => Err(ConfigError::UnknownCountry(code)),
    }
}
