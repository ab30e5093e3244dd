//! Command-line interface definitions.
//!
//! Every provider setting can also come from the environment or from a YAML
//! config file; see [`crate::config`] for precedence.

use clap::{Parser, ValueEnum};

/// How the view is rendered on stdout.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored terminal cards
    #[default]
    Text,
    /// Markdown document
    Markdown,
    /// The raw state as JSON
    Json,
}

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Interactive session, key from the environment
/// NEWSAPI_KEY=... global_news
///
/// # Headlines for Japan, printed once as JSON
/// global_news --api-key ... --country jp --once --format json
///
/// # Search, with settings from a config file
/// global_news -c ~/.config/global_news.yaml -q election --once
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Provider base URL
    #[arg(long, env = "NEWSAPI_BASE_URL")]
    pub base_url: Option<String>,

    /// Country selected at startup
    #[arg(long)]
    pub country: Option<String>,

    /// Search text entered at startup
    #[arg(short, long)]
    pub query: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Fetch once, print the result and exit
    #[arg(long)]
    pub once: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["global_news"]);

        assert_eq!(cli.config, None);
        assert_eq!(cli.country, None);
        assert_eq!(cli.query, None);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.once);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "global_news",
            "--api-key",
            "abc",
            "--base-url",
            "http://localhost:9000/",
            "--country",
            "jp",
            "--format",
            "json",
            "--once",
        ]);

        assert_eq!(cli.api_key.as_deref(), Some("abc"));
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:9000/"));
        assert_eq!(cli.country.as_deref(), Some("jp"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.once);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["global_news", "-c", "/tmp/news.yaml", "-q", "election"]);

        assert_eq!(cli.config.as_deref(), Some("/tmp/news.yaml"));
        assert_eq!(cli.query.as_deref(), Some("election"));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result = Cli::try_parse_from(["global_news", "--format", "html"]);
        assert!(result.is_err());
    }
}
