//! Dashboard state and its reducer.
//!
//! `QueryState` is never edited field by field: every change goes through
//! [`QueryState::reduce`], which consumes the old value and returns the next
//! one. The reducer upholds the state invariants:
//!
//! - `status == Error` ⇒ `quotes` is empty and `error_message` is non-empty.
//! - `status == Loading` keeps the previous quotes on screen until the fetch
//!   resolves.
//! - `suggestions` never holds more than `MAX_SUGGESTIONS` items.
use quote_common::model::MAX_SUGGESTIONS;
use quote_common::{Quote, SuggestionItem};
use serde::Serialize;
use strum_macros::Display;

/// Fallback message for failures that carried no text.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Lifecycle of the quote table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A quote fetch is in flight.
    Loading,
    /// The latest quote fetch succeeded.
    Ready,
    /// The latest quote fetch failed.
    Error,
}

/// Snapshot of everything the UI shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    /// Text currently typed in the search box.
    pub raw_input: String,
    /// Symbol last chosen from the suggestions (or the start-up default).
    pub selected_symbol: String,
    /// Quotes of the latest successful fetch, upstream order.
    pub quotes: Vec<Quote>,
    /// Typeahead suggestions for `raw_input`, relevance order.
    pub suggestions: Vec<SuggestionItem>,
    /// Quote table status.
    pub status: Status,
    /// Message of the latest quote failure; set only while `status == Error`.
    pub error_message: Option<String>,
}

/// State changes understood by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The user edited the search box.
    InputChanged(String),
    /// A suggestion response won the race.
    SuggestionsReplaced(Vec<SuggestionItem>),
    /// Suggestions no longer match the input.
    SuggestionsCleared,
    /// A suggestion was picked; it becomes both the selection and the input.
    SymbolSelected(String),
    /// A quote fetch was issued.
    QuoteRequested,
    /// The latest quote fetch succeeded.
    QuotesLoaded(Vec<Quote>),
    /// The latest quote fetch failed with the given message.
    QuoteFailed(String),
}

impl QueryState {
    /// Initial state for a session starting on `default_symbol`.
    pub fn new(default_symbol: &str) -> Self {
        QueryState {
            raw_input: default_symbol.to_string(),
            selected_symbol: default_symbol.to_string(),
            quotes: Vec::new(),
            suggestions: Vec::new(),
            status: Status::Idle,
            error_message: None,
        }
    }

    /// Apply one transition and return the next state.
    pub fn reduce(self, transition: Transition) -> Self {
        match transition {
            Transition::InputChanged(text) => QueryState {
                raw_input: text,
                ..self
            },
            Transition::SuggestionsReplaced(mut items) => {
                items.truncate(MAX_SUGGESTIONS);
                QueryState {
                    suggestions: items,
                    ..self
                }
            }
            Transition::SuggestionsCleared => QueryState {
                suggestions: Vec::new(),
                ..self
            },
            Transition::SymbolSelected(symbol) => QueryState {
                raw_input: symbol.clone(),
                selected_symbol: symbol,
                suggestions: Vec::new(),
                ..self
            },
            Transition::QuoteRequested => QueryState {
                status: Status::Loading,
                error_message: None,
                ..self
            },
            Transition::QuotesLoaded(quotes) => QueryState {
                quotes,
                status: Status::Ready,
                error_message: None,
                ..self
            },
            Transition::QuoteFailed(message) => {
                let message = if message.trim().is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    message
                };
                QueryState {
                    quotes: Vec::new(),
                    status: Status::Error,
                    error_message: Some(message),
                    ..self
                }
            }
        }
    }
}
