//! Error types shared between the dashboard and its helpers.
//!
//! The `QuoteError` enum unifies the failure cases of one fetch cycle: the
//! upstream answered with an unexpected shape, the transport failed, or a
//! price field was not numeric. A few plumbing variants (I/O, channels, JSON)
//! let crates propagate a single error type with `?`.
use std::io;

use thiserror::Error;

/// Unified error type shared across the workspace.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// None of the expected top-level keys was present in the upstream body.
    ///
    /// Usually rate limiting or an unknown symbol.
    #[error("API error or limit reached: {0}")]
    UpstreamShape(String),

    /// Transport failure (DNS, TLS, timeout, non-success HTTP status).
    #[error("Network error: {0}")]
    Network(String),

    /// A price field could not be read as a non-negative decimal.
    #[error("Invalid price for {symbol}: {value:?}")]
    Parse {
        /// Symbol the price belongs to.
        symbol: String,
        /// Raw upstream value.
        value: String,
    },

    /// The user-provided query could not be turned into a request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error originating from the standard library (stdin, files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Error while parsing a watchlist file into symbols.
    #[error("Parse symbols file error: {0}")]
    ParseSymbolsFile(String),

    /// Channel receive failed (e.g., every sender dropped); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),
}

impl QuoteError {
    /// Short, stable tag used when logging a failure.
    ///
    /// The UI shows every fetch failure the same way; the tag keeps the
    /// distinction available in the logs.
    pub fn kind(&self) -> &'static str {
        match self {
            QuoteError::UpstreamShape(_) => "upstream_shape",
            QuoteError::Network(_) => "network",
            QuoteError::Parse { .. } => "parse",
            QuoteError::InvalidInput(_) => "invalid_input",
            QuoteError::Io(_) => "io",
            QuoteError::SerdeJson(_) => "json",
            QuoteError::ParseSymbolsFile(_) => "symbols_file",
            QuoteError::ChannelRecv(_) => "channel",
        }
    }
}
