//! Upstream response normalization.
//!
//! The upstream answers "the same kind of data" in several shapes. This module
//! turns any of them into `Quote` / `SuggestionItem` values, choosing the
//! parser by which known top-level key is present:
//!
//! - `"Stock Quotes"` — either an array of `{"1. symbol", "2. price"}` entries
//!   or a batch object keyed by symbol whose values are such entries.
//! - `"Time Series (5min)"` — timestamp-keyed bars; the most recent bar's
//!   `"1. open"` is the current price.
//! - `"bestMatches"` — ranked search hits, truncated to `MAX_SUGGESTIONS`.
//!
//! A body without the expected key is an upstream failure, never an empty
//! success.
use chrono::NaiveDateTime;
use log::debug;
use serde_json::{Map, Value};

use crate::error::QuoteError;
use crate::model::{MAX_SUGGESTIONS, Quote, SuggestionItem};
use crate::net::{BEST_MATCHES_KEY, NOTICE_KEYS, STOCK_QUOTES_KEY, TIME_SERIES_KEY};
use crate::result::Result;

const SYMBOL_FIELD: &str = "1. symbol";
const PRICE_FIELD: &str = "2. price";
const OPEN_FIELD: &str = "1. open";
const NAME_FIELD: &str = "2. name";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalize a quote response for the `requested` symbols.
///
/// Returned quotes follow upstream order, carry the requested spelling of each
/// symbol, and cover exactly the requested set.
pub fn normalize_quotes(requested: &[String], body: &Value) -> Result<Vec<Quote>> {
    let root = body
        .as_object()
        .ok_or_else(|| QuoteError::UpstreamShape("response is not a JSON object".to_string()))?;

    let quotes = if let Some(series) = root.get(TIME_SERIES_KEY) {
        vec![latest_bar_quote(requested, series)?]
    } else if let Some(batch) = root.get(STOCK_QUOTES_KEY) {
        batch_quotes(requested, batch)?
    } else {
        return Err(missing_key(root, &[TIME_SERIES_KEY, STOCK_QUOTES_KEY]));
    };

    if let Some(absent) = requested
        .iter()
        .find(|want| !quotes.iter().any(|q| &q.symbol == *want))
    {
        return Err(QuoteError::UpstreamShape(format!("no quote returned for {}", absent)));
    }
    Ok(quotes)
}

/// Normalize a symbol search response into at most `MAX_SUGGESTIONS` items.
pub fn normalize_suggestions(body: &Value) -> Result<Vec<SuggestionItem>> {
    let root = body
        .as_object()
        .ok_or_else(|| QuoteError::UpstreamShape("response is not a JSON object".to_string()))?;
    let matches = root
        .get(BEST_MATCHES_KEY)
        .ok_or_else(|| missing_key(root, &[BEST_MATCHES_KEY]))?
        .as_array()
        .ok_or_else(|| QuoteError::UpstreamShape(format!("{:?} is not an array", BEST_MATCHES_KEY)))?;

    Ok(matches
        .iter()
        .filter_map(|entry| {
            let symbol = field_str(entry, SYMBOL_FIELD)?;
            let name = field_str(entry, NAME_FIELD).unwrap_or_default();
            Some(SuggestionItem {
                symbol: symbol.to_string(),
                name: name.to_string(),
            })
        })
        .take(MAX_SUGGESTIONS)
        .collect())
}

fn latest_bar_quote(requested: &[String], series: &Value) -> Result<Quote> {
    let symbol = match requested {
        [one] => one,
        _ => {
            return Err(QuoteError::UpstreamShape(format!(
                "time series answers one symbol, {} requested",
                requested.len()
            )));
        }
    };
    let bars = series
        .as_object()
        .ok_or_else(|| QuoteError::UpstreamShape(format!("{:?} is not an object", TIME_SERIES_KEY)))?;

    let mut latest: Option<(NaiveDateTime, &Value)> = None;
    for (stamp, bar) in bars {
        let at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .map_err(|e| QuoteError::UpstreamShape(format!("bad timestamp {:?}: {}", stamp, e)))?;
        if latest.is_none_or(|(best, _)| at > best) {
            latest = Some((at, bar));
        }
    }

    let (at, bar) =
        latest.ok_or_else(|| QuoteError::UpstreamShape("time series is empty".to_string()))?;
    debug!("Latest bar for {} at {}", symbol, at);
    let open = price_field(symbol, bar, OPEN_FIELD)?;
    Quote::from_raw(symbol, &open)
}

fn batch_quotes(requested: &[String], batch: &Value) -> Result<Vec<Quote>> {
    let entries: Vec<&Value> = match batch {
        Value::Array(items) => items.iter().collect(),
        Value::Object(by_symbol) => by_symbol.values().collect(),
        _ => {
            return Err(QuoteError::UpstreamShape(format!(
                "{:?} is neither an array nor an object",
                STOCK_QUOTES_KEY
            )));
        }
    };

    let mut quotes: Vec<Quote> = Vec::with_capacity(requested.len());
    for entry in entries {
        let Some(upstream_symbol) = field_str(entry, SYMBOL_FIELD) else {
            debug!("Skipping batch entry without symbol: {}", entry);
            continue;
        };
        let Some(wanted) = requested
            .iter()
            .find(|s| s.eq_ignore_ascii_case(upstream_symbol))
        else {
            debug!("Skipping unrequested symbol {}", upstream_symbol);
            continue;
        };
        if quotes.iter().any(|q| &q.symbol == wanted) {
            continue;
        }
        let raw = price_field(wanted, entry, PRICE_FIELD)?;
        quotes.push(Quote::from_raw(wanted, &raw)?);
    }
    Ok(quotes)
}

fn field_str<'a>(entry: &'a Value, field: &str) -> Option<&'a str> {
    entry.get(field).and_then(Value::as_str)
}

/// Prices usually arrive as strings; bare JSON numbers are accepted too.
fn price_field(symbol: &str, entry: &Value, field: &str) -> Result<String> {
    match entry.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(QuoteError::Parse {
            symbol: symbol.to_string(),
            value: other.to_string(),
        }),
        None => Err(QuoteError::UpstreamShape(format!(
            "{:?} missing for {}",
            field, symbol
        ))),
    }
}

fn missing_key(root: &Map<String, Value>, expected: &[&str]) -> QuoteError {
    let notice = NOTICE_KEYS
        .iter()
        .find_map(|key| root.get(*key).and_then(Value::as_str));
    match notice {
        Some(text) => QuoteError::UpstreamShape(text.to_string()),
        None => QuoteError::UpstreamShape(format!("expected one of {:?}", expected)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn syms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn time_series_uses_latest_open() {
        let body = json!({
            "Meta Data": { "2. Symbol": "AAPL" },
            "Time Series (5min)": {
                "2024-01-01 09:55:00": { "1. open": "171.00", "4. close": "171.90" },
                "2024-01-01 10:00:00": { "1. open": "172.50", "4. close": "173.00" },
                "2023-12-31 16:00:00": { "1. open": "180.00" }
            }
        });
        let quotes = normalize_quotes(&syms(&["AAPL"]), &body).unwrap();
        assert_eq!(
            quotes,
            vec![Quote {
                symbol: "AAPL".to_string(),
                price: Decimal::new(17250, 2)
            }]
        );
    }

    #[test]
    fn time_series_keeps_requested_case() {
        let body = json!({ "Time Series (5min)": { "2024-01-01 10:00:00": { "1. open": "1" } } });
        let quotes = normalize_quotes(&syms(&["aapl"]), &body).unwrap();
        assert_eq!(quotes[0].symbol, "aapl");
    }

    #[test]
    fn empty_time_series_is_upstream_failure() {
        let body = json!({ "Time Series (5min)": {} });
        let err = normalize_quotes(&syms(&["AAPL"]), &body).unwrap_err();
        assert_eq!(err.kind(), "upstream_shape");
    }

    #[test]
    fn stock_quotes_array_preserves_upstream_order() {
        let body = json!({
            "Stock Quotes": [
                { "1. symbol": "MSFT", "2. price": "410.10" },
                { "1. symbol": "AAPL", "2. price": "172.50" },
                { "1. symbol": "TSLA", "2. price": "250.00" }
            ]
        });
        let quotes = normalize_quotes(&syms(&["aapl", "MSFT"]), &body).unwrap();
        let symbols: Vec<&str> = quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["MSFT", "aapl"]);
        assert_eq!(quotes[1].price, Decimal::new(17250, 2));
    }

    #[test]
    fn stock_quotes_object_is_accepted() {
        let body = json!({
            "Stock Quotes": {
                "AAPL": { "1. symbol": "AAPL", "2. price": 172.5 },
                "MSFT": { "1. symbol": "MSFT", "2. price": "410" }
            }
        });
        let quotes = normalize_quotes(&syms(&["AAPL", "MSFT"]), &body).unwrap();
        assert_eq!(quotes.len(), 2);
        assert!(quotes.iter().all(|q| q.price >= Decimal::ZERO));
    }

    #[test]
    fn stock_quotes_object_keeps_upstream_key_order() {
        let raw = r#"{"Stock Quotes": {
            "MSFT": { "1. symbol": "MSFT", "2. price": "410" },
            "AAPL": { "1. symbol": "AAPL", "2. price": "172.5" }
        }}"#;
        let body: Value = serde_json::from_str(raw).unwrap();
        let quotes = normalize_quotes(&syms(&["AAPL", "MSFT"]), &body).unwrap();
        let symbols: Vec<&str> = quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["MSFT", "AAPL"]);
    }

    #[test]
    fn missing_requested_symbol_is_failure() {
        let body = json!({ "Stock Quotes": [ { "1. symbol": "AAPL", "2. price": "1" } ] });
        let err = normalize_quotes(&syms(&["AAPL", "MSFT"]), &body).unwrap_err();
        assert!(matches!(err, QuoteError::UpstreamShape(msg) if msg.contains("MSFT")));
    }

    #[test]
    fn empty_object_is_upstream_failure() {
        let err = normalize_quotes(&syms(&["AAPL"]), &json!({})).unwrap_err();
        assert!(matches!(err, QuoteError::UpstreamShape(_)));
    }

    #[test]
    fn rate_limit_note_is_reported() {
        let body = json!({ "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute." });
        let err = normalize_quotes(&syms(&["AAPL"]), &body).unwrap_err();
        assert!(err.to_string().contains("call frequency"));
    }

    #[test]
    fn non_numeric_price_is_parse_error() {
        let body = json!({ "Stock Quotes": [ { "1. symbol": "AAPL", "2. price": "abc" } ] });
        let err = normalize_quotes(&syms(&["AAPL"]), &body).unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn suggestions_are_capped_in_upstream_order() {
        let matches: Vec<Value> = (1..=7)
            .map(|i| json!({ "1. symbol": format!("APP{}", i), "2. name": format!("App {}", i), "9. matchScore": "0.9" }))
            .collect();
        let body = json!({ "bestMatches": matches });
        let items = normalize_suggestions(&body).unwrap();
        assert_eq!(items.len(), MAX_SUGGESTIONS);
        assert_eq!(items[0].symbol, "APP1");
        assert_eq!(items[4].name, "App 5");
    }

    #[test]
    fn suggestions_need_best_matches_key() {
        assert!(normalize_suggestions(&json!({})).is_err());
        assert!(normalize_suggestions(&json!({ "bestMatches": [] })).unwrap().is_empty());
    }
}
