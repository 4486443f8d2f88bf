//! Upstream API constants shared by the request builder and the normalizer.

/// Default endpoint of the quote/search API.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
/// Key used when none is configured; the upstream answers it with demo data only.
pub const DEFAULT_API_KEY: &str = "demo";
/// Interval requested for intraday time series.
pub const INTERVAL: &str = "5min";
/// Response format requested from the upstream.
pub const DATATYPE: &str = "json";

/// Top-level key of batch quote responses.
pub const STOCK_QUOTES_KEY: &str = "Stock Quotes";
/// Top-level key of intraday time-series responses (matches `INTERVAL`).
pub const TIME_SERIES_KEY: &str = "Time Series (5min)";
/// Top-level key of symbol search responses.
pub const BEST_MATCHES_KEY: &str = "bestMatches";

/// Keys the upstream uses to explain a refused request (rate limit, bad key, bad symbol).
pub const NOTICE_KEYS: [&str; 3] = ["Note", "Information", "Error Message"];
