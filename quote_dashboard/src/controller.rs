//! Query/suggestion controller.
//!
//! The controller owns the `QueryState` and is the only thing that changes it.
//! User operations return an optional [`Effect`] describing the fetch to issue;
//! the event loop runs it elsewhere and hands the outcome back through
//! [`QueryController::apply_quote_response`] or
//! [`QueryController::apply_suggestion_response`].
//!
//! Every fetch carries a [`Ticket`] with a per-kind sequence number. Only the
//! response to the most recently issued fetch of a kind may touch state; all
//! others are dropped. Clearing the suggestion list also advances the
//! suggestion sequence so a late response cannot bring old items back.
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use quote_common::normalize::{normalize_quotes, normalize_suggestions};
use quote_common::symbols::split_query;
use quote_common::{QueryMode, QuoteError, Result, UpstreamRequest};
use serde_json::Value;

use crate::model::state::{QueryState, Status, Transition};

/// Default cap on how old a suggestion response may be when it arrives.
pub const DEFAULT_SUGGEST_TIMEOUT: Duration = Duration::from_millis(3000);

/// Kind of fetch a ticket belongs to; each kind has its own sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Quote table fetch.
    Quote,
    /// Typeahead lookup.
    Suggestion,
}

/// Tag attached to an outgoing fetch and returned with its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    /// Fetch kind.
    pub kind: FetchKind,
    /// Sequence number within the kind, strictly increasing.
    pub seq: u64,
    /// When the fetch was issued.
    pub issued_at: Instant,
}

/// A fetch the controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    /// Tag to hand back with the outcome.
    pub ticket: Ticket,
    /// What to fetch.
    pub request: UpstreamRequest,
}

/// Controller settings fixed for a session.
#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    /// Which quote endpoint to use.
    pub mode: QueryMode,
    /// Suggestion responses older than this on arrival are dropped.
    pub suggest_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            mode: QueryMode::Auto,
            suggest_timeout: DEFAULT_SUGGEST_TIMEOUT,
        }
    }
}

/// Translates user input into upstream fetches and keeps `QueryState` consistent.
pub struct QueryController {
    state: QueryState,
    config: ControllerConfig,
    quote_seq: u64,
    suggestion_seq: u64,
    /// Symbols of the latest quote fetch, used to normalize its response.
    pending_symbols: Vec<String>,
}

impl QueryController {
    /// Create a controller whose session starts on `default_symbol`.
    pub fn new(default_symbol: &str, config: ControllerConfig) -> Self {
        Self {
            state: QueryState::new(default_symbol),
            config,
            quote_seq: 0,
            suggestion_seq: 0,
            pending_symbols: Vec::new(),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// `true` when no quote fetch is waiting for its response.
    pub fn is_settled(&self) -> bool {
        self.state.status != Status::Loading
    }

    /// Update the search text and look up suggestions for it.
    ///
    /// Blank text clears the suggestions without any fetch.
    pub fn set_input(&mut self, text: &str) -> Option<Effect> {
        self.transition(Transition::InputChanged(text.to_string()));
        self.fetch_suggestions(text)
    }

    /// Issue a keyword lookup; blank keywords just clear the list.
    pub fn fetch_suggestions(&mut self, keyword: &str) -> Option<Effect> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            self.clear_suggestions();
            return None;
        }
        self.suggestion_seq += 1;
        debug!("Suggestion fetch #{} for {:?}", self.suggestion_seq, keyword);
        Some(Effect {
            ticket: Ticket {
                kind: FetchKind::Suggestion,
                seq: self.suggestion_seq,
                issued_at: Instant::now(),
            },
            request: UpstreamRequest::search(keyword),
        })
    }

    /// Fetch quotes for one symbol or a comma-joined list.
    ///
    /// Blank input is ignored. Input the configured mode cannot serve puts the
    /// state in `Error` without a fetch.
    pub fn fetch_quote(&mut self, symbol_or_list: &str) -> Option<Effect> {
        let symbols = split_query(symbol_or_list);
        if symbols.is_empty() {
            debug!("Ignoring empty quote query");
            return None;
        }

        // Any older quote fetch is superseded from here on, even if this one fails validation.
        self.quote_seq += 1;
        let request = match UpstreamRequest::quote(symbols.clone(), self.config.mode) {
            Ok(request) => request,
            Err(e) => {
                self.fail_quote(&e);
                return None;
            }
        };

        info!("Quote fetch #{} for {}", self.quote_seq, symbols.join(","));
        self.pending_symbols = symbols;
        self.transition(Transition::QuoteRequested);
        Some(Effect {
            ticket: Ticket {
                kind: FetchKind::Quote,
                seq: self.quote_seq,
                issued_at: Instant::now(),
            },
            request,
        })
    }

    /// Pick a suggestion: it becomes the input and the selection, then gets quoted.
    pub fn select_suggestion(&mut self, symbol: &str) -> Option<Effect> {
        self.suggestion_seq += 1;
        self.transition(Transition::SymbolSelected(symbol.to_string()));
        self.fetch_quote(symbol)
    }

    /// Quote whatever is in the search box; no-op when it is blank.
    pub fn submit_on_enter(&mut self) -> Option<Effect> {
        if self.state.raw_input.trim().is_empty() {
            return None;
        }
        let input = self.state.raw_input.clone();
        self.fetch_quote(&input)
    }

    /// Apply a quote fetch outcome. Returns `false` if it was superseded.
    pub fn apply_quote_response(&mut self, ticket: Ticket, result: Result<Value>) -> bool {
        if ticket.kind != FetchKind::Quote || ticket.seq != self.quote_seq {
            debug!(
                "Discarding stale quote response #{} (latest #{})",
                ticket.seq, self.quote_seq
            );
            return false;
        }

        let outcome = result.and_then(|body| normalize_quotes(&self.pending_symbols, &body));
        match outcome {
            Ok(quotes) => {
                info!("Quote fetch #{} resolved with {} quote(s)", ticket.seq, quotes.len());
                self.transition(Transition::QuotesLoaded(quotes));
            }
            Err(e) => self.fail_quote(&e),
        }
        true
    }

    /// Apply a suggestion fetch outcome. Returns `false` if it was superseded or too old.
    ///
    /// Failures are silent: the list is cleared and no error is shown.
    pub fn apply_suggestion_response(&mut self, ticket: Ticket, result: Result<Value>) -> bool {
        if ticket.kind != FetchKind::Suggestion || ticket.seq != self.suggestion_seq {
            debug!(
                "Discarding stale suggestion response #{} (latest #{})",
                ticket.seq, self.suggestion_seq
            );
            return false;
        }

        let age = ticket.issued_at.elapsed();
        if age > self.config.suggest_timeout {
            debug!("Discarding suggestion response #{} after {:?}", ticket.seq, age);
            self.transition(Transition::SuggestionsCleared);
            return false;
        }

        match result.and_then(|body| normalize_suggestions(&body)) {
            Ok(items) => self.transition(Transition::SuggestionsReplaced(items)),
            Err(e) => {
                debug!("Suggestion fetch #{} failed [{}]: {}", ticket.seq, e.kind(), e);
                self.transition(Transition::SuggestionsCleared);
            }
        }
        true
    }

    fn clear_suggestions(&mut self) {
        self.suggestion_seq += 1;
        self.transition(Transition::SuggestionsCleared);
    }

    fn fail_quote(&mut self, err: &QuoteError) {
        warn!("Quote fetch #{} failed [{}]: {}", self.quote_seq, err.kind(), err);
        self.transition(Transition::QuoteFailed(err.to_string()));
    }

    fn transition(&mut self, transition: Transition) {
        let current = std::mem::replace(&mut self.state, QueryState::new(""));
        self.state = current.reduce(transition);
    }
}
