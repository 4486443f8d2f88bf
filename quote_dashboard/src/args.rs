//! Command-line arguments for the Quote Dashboard.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use quote_common::net::{DEFAULT_API_KEY, DEFAULT_BASE_URL};
use quote_common::symbols::{SymbolParser, Symbols, join_symbols, split_query};
use quote_common::{QueryMode, QuoteError, Result};

use crate::controller::ControllerConfig;
use crate::render::OutputFormat;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// API key for the quote service.
    #[clap(long, env = "ALPHAVANTAGE_API_KEY", default_value = DEFAULT_API_KEY, hide_env_values = true)]
    pub api_key: String,

    /// Endpoint of the quote service.
    #[clap(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Initial query: one symbol or a comma-separated list.
    #[clap(long, default_value = "AAPL")]
    pub symbols: String,

    /// Text file with symbols separated by commas, spaces, or new lines.
    /// Takes precedence over `--symbols`.
    #[clap(long)]
    pub watchlist: Option<String>,

    /// Which quote endpoint to use.
    #[clap(long, value_enum, default_value_t = QueryMode::Auto)]
    pub mode: QueryMode,

    /// Suggestion responses slower than this are dropped.
    #[clap(long, default_value_t = 3000)]
    pub suggest_timeout_ms: u64,

    /// Transport timeout for quote requests.
    #[clap(long, default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// How state snapshots are printed.
    #[clap(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

impl Args {
    /// Comma-joined query to fetch at start-up.
    pub fn initial_query(&self) -> Result<String> {
        let symbols = match &self.watchlist {
            Some(raw) => {
                let path = normalize_path(raw);
                if !is_file_exist(&path) {
                    return Err(QuoteError::InvalidInput(format!(
                        "watchlist {} is not a file",
                        path.display()
                    )));
                }
                let file = File::open(&path)?;
                Symbols::parse_from_file(BufReader::new(file))?
            }
            None => split_query(&self.symbols),
        };

        if symbols.is_empty() {
            return Err(QuoteError::InvalidInput("no symbols to watch".to_string()));
        }
        Ok(join_symbols(&symbols))
    }

    /// Controller settings derived from the flags.
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            mode: self.mode,
            suggest_timeout: self.suggest_timeout(),
        }
    }

    /// Suggestion latency cap.
    pub fn suggest_timeout(&self) -> Duration {
        Duration::from_millis(self.suggest_timeout_ms)
    }

    /// Quote request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// Returns `true` if the provided path exists and is a regular file.
fn is_file_exist(path: &Path) -> bool {
    path.is_file()
}
