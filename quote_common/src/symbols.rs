//! Symbol-list parsing shared by the controller and the CLI.
//!
//! A query is one symbol or several separated by commas; watchlist files may
//! also use spaces or new lines. Symbols keep the case they were typed in.
use std::io::BufRead;

use crate::error::QuoteError;

/// Trait providing file parsing for symbol lists.
pub trait SymbolParser {
    /// Parses symbols from a buffered reader.
    ///
    /// Every line may hold several symbols separated by commas or whitespace.
    /// Blank lines and `#` comments are skipped.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<String>, QuoteError>;
}

/// Marker type carrying the symbol parsing helpers.
pub struct Symbols;

impl SymbolParser for Symbols {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<String>, QuoteError> {
        let mut symbols = Vec::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(QuoteError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            for token in trimmed_line.split(|c: char| c == ',' || c.is_whitespace()) {
                if token.is_empty() {
                    continue;
                }
                if !is_valid_symbol(token) {
                    return Err(QuoteError::ParseSymbolsFile(format!(
                        "line {}: invalid symbol {:?}",
                        index + 1,
                        token
                    )));
                }
                push_unique(&mut symbols, token);
            }
        }
        Ok(symbols)
    }
}

/// Split a comma-joined query into its symbols.
///
/// Surrounding whitespace is trimmed, empty segments are skipped and repeated
/// symbols (compared case-insensitively) are kept once, first spelling wins.
pub fn split_query(input: &str) -> Vec<String> {
    let mut symbols = Vec::new();
    for token in input.split(',').map(str::trim) {
        if !token.is_empty() {
            push_unique(&mut symbols, token);
        }
    }
    symbols
}

/// Join symbols back into the comma-separated form the upstream expects.
pub fn join_symbols(symbols: &[String]) -> String {
    symbols.join(",")
}

/// Symbols are ASCII alphanumerics plus `.`, `-`, `^` and `=` (e.g. `BRK.B`, `^GSPC`).
pub fn is_valid_symbol(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
}

fn push_unique(symbols: &mut Vec<String>, token: &str) {
    if !symbols.iter().any(|s| s.eq_ignore_ascii_case(token)) {
        symbols.push(token.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn split_query_trims_and_dedups() {
        assert_eq!(split_query(" AAPL, msft ,,AAPL "), vec!["AAPL", "msft"]);
        assert!(split_query(" , ").is_empty());
    }

    #[test]
    fn split_query_keeps_case() {
        assert_eq!(split_query("aapl"), vec!["aapl"]);
    }

    #[test]
    fn parses_watchlist_with_mixed_separators() {
        let file = "# tech\nAAPL, MSFT\n\nGOOGL AMZN\nBRK.B\n";
        let symbols = Symbols::parse_from_file(Cursor::new(file)).unwrap();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "GOOGL", "AMZN", "BRK.B"]);
    }

    #[test]
    fn rejects_garbage_in_watchlist() {
        let err = Symbols::parse_from_file(Cursor::new("AAPL\nMS/FT\n")).unwrap_err();
        assert!(matches!(err, QuoteError::ParseSymbolsFile(msg) if msg.contains("line 2")));
    }
}
