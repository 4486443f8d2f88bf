//! Upstream request descriptions.
//!
//! An `UpstreamRequest` is what the controller asks the transport to fetch:
//! the API function plus its symbol or keyword argument. It renders itself
//! into the GET query parameters (`function`, `symbol`/`symbols`/`keywords`,
//! `apikey`, optional `interval`/`datatype`).
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::QuoteError;
use crate::net::{DATATYPE, INTERVAL};
use crate::symbols::join_symbols;

/// Upstream API functions used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiFunction {
    /// Intraday series for one symbol.
    TimeSeriesIntraday,
    /// Latest quote for several symbols at once.
    BatchStockQuotes,
    /// Keyword lookup for typeahead suggestions.
    SymbolSearch,
}

/// Which quote endpoint a deployment uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display)]
#[clap(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum QueryMode {
    /// Time series for a single symbol, batch quotes for several.
    #[default]
    Auto,
    /// Always the intraday time series; only one symbol per query.
    TimeSeries,
    /// Always the batch quote endpoint.
    Batch,
}

/// One GET against the upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamRequest {
    /// Function requested.
    pub function: ApiFunction,
    /// Symbols of a quote request (empty for searches).
    pub symbols: Vec<String>,
    /// Keyword of a search request (empty for quotes).
    pub keywords: String,
}

impl UpstreamRequest {
    /// Creates the quote request for `symbols` according to `mode`.
    pub fn quote(symbols: Vec<String>, mode: QueryMode) -> Result<Self, QuoteError> {
        if symbols.is_empty() {
            return Err(QuoteError::InvalidInput("no symbol given".to_string()));
        }
        let function = match (mode, symbols.len()) {
            (QueryMode::Batch, _) => ApiFunction::BatchStockQuotes,
            (QueryMode::Auto, 1) | (QueryMode::TimeSeries, 1) => ApiFunction::TimeSeriesIntraday,
            (QueryMode::Auto, _) => ApiFunction::BatchStockQuotes,
            (QueryMode::TimeSeries, n) => {
                return Err(QuoteError::InvalidInput(format!(
                    "time-series mode takes one symbol, got {}",
                    n
                )));
            }
        };
        Ok(UpstreamRequest {
            function,
            symbols,
            keywords: String::new(),
        })
    }

    /// Creates a keyword search request.
    pub fn search(keywords: &str) -> Self {
        UpstreamRequest {
            function: ApiFunction::SymbolSearch,
            symbols: Vec::new(),
            keywords: keywords.to_string(),
        }
    }

    /// Query parameters of this request, `apikey` last.
    pub fn query_pairs(&self, api_key: &str) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("function", self.function.to_string())];
        match self.function {
            ApiFunction::TimeSeriesIntraday => {
                pairs.push(("symbol", join_symbols(&self.symbols)));
                pairs.push(("interval", INTERVAL.to_string()));
                pairs.push(("datatype", DATATYPE.to_string()));
            }
            ApiFunction::BatchStockQuotes => {
                pairs.push(("symbols", join_symbols(&self.symbols)));
                pairs.push(("datatype", DATATYPE.to_string()));
            }
            ApiFunction::SymbolSearch => {
                pairs.push(("keywords", self.keywords.clone()));
            }
        }
        pairs.push(("apikey", api_key.to_string()));
        pairs
    }
}
