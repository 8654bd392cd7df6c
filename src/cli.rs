//! Command-line and environment configuration.

use clap::Parser;
use std::path::PathBuf;

use crate::error::{simple_error, Result};

/// TUI to browse users from a remote directory API.
#[derive(Parser, Debug)]
#[command(name = "userdeck", version, about)]
pub struct Cli {
    /// Base URL of the directory API exposing /users and /users/<id>.
    #[arg(
        long,
        env = "USERDECK_API_URL",
        default_value = "https://jsonplaceholder.typicode.com"
    )]
    pub api_url: String,

    /// Quiescence window for the search input, in milliseconds.
    #[arg(long, env = "USERDECK_DEBOUNCE_MS", default_value_t = 300)]
    pub debounce_ms: u64,

    /// Event-loop tick rate, in milliseconds.
    #[arg(long, env = "USERDECK_TICK_MS", default_value_t = 100)]
    pub tick_ms: u64,

    /// Append logs to this file; logging is disabled when unset.
    #[arg(long, env = "USERDECK_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Reject base URLs the HTTP client cannot talk to before any terminal
    /// state is touched.
    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(simple_error(format!(
                "invalid --api-url '{}': expected http://... or https://...",
                self.api_url
            )));
        }
        if self.tick_ms == 0 {
            return Err(simple_error("--tick-ms must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("userdeck").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_point_at_public_directory() {
        let cli = parse(&[]);
        assert_eq!(cli.api_url, "https://jsonplaceholder.typicode.com");
        assert_eq!(cli.debounce_ms, 300);
        assert_eq!(cli.tick_ms, 100);
        assert!(cli.log_file.is_none());
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn rejects_non_http_api_url() {
        let cli = parse(&["--api-url", "ftp://example.com"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn rejects_zero_tick() {
        let cli = parse(&["--tick-ms", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&["--api-url", "http://localhost:3000", "--debounce-ms", "50"]);
        assert_eq!(cli.api_url, "http://localhost:3000");
        assert_eq!(cli.debounce_ms, 50);
        assert!(cli.validate().is_ok());
    }
}
