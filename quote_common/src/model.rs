//! Normalized records shown to the user.
//!
//! Whatever shape the upstream answered with, data enters the dashboard only
//! as `Quote` and `SuggestionItem` values built here.
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// Maximum number of suggestions kept per keystroke.
pub const MAX_SUGGESTIONS: usize = 5;

/// Market quote for a single symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol as the user requested it (e.g., `AAPL`).
    pub symbol: String,
    /// Current price, never negative.
    pub price: Decimal,
}

impl Quote {
    /// Build a quote from a raw upstream price string.
    ///
    /// Accepts plain (`"172.50"`) and scientific (`"1.7250e2"`) notation.
    /// Non-numeric or negative values yield `QuoteError::Parse`.
    pub fn from_raw(symbol: &str, raw_price: &str) -> Result<Quote, QuoteError> {
        let trimmed = raw_price.trim();
        let price = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| QuoteError::Parse {
                symbol: symbol.to_string(),
                value: raw_price.to_string(),
            })?;

        if price.is_sign_negative() && !price.is_zero() {
            return Err(QuoteError::Parse {
                symbol: symbol.to_string(),
                value: raw_price.to_string(),
            });
        }

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
        })
    }
}

/// One typeahead suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    /// Ticker symbol.
    pub symbol: String,
    /// Company or fund name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_price_exactly() {
        let quote = Quote::from_raw("AAPL", "172.50").unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, Decimal::new(17250, 2));
        assert_eq!(quote.price.to_string(), "172.50");
    }

    #[test]
    fn accepts_scientific_notation_and_zero() {
        let quote = Quote::from_raw("X", "1.725e2").unwrap();
        assert_eq!(quote.price, Decimal::new(1725, 1));
        assert!(Quote::from_raw("X", "0").is_ok());
    }

    #[test]
    fn rejects_non_numeric_and_negative() {
        assert!(matches!(
            Quote::from_raw("MSFT", "n/a"),
            Err(QuoteError::Parse { .. })
        ));
        assert!(matches!(
            Quote::from_raw("MSFT", "-1.00"),
            Err(QuoteError::Parse { .. })
        ));
    }
}
