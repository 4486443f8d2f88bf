//! Running controller effects off the event thread.
//!
//! Each `Effect` gets a short-lived worker thread that performs the blocking
//! GET and posts a `FetchOutcome` back over a channel. Workers never touch
//! controller state; the event loop applies outcomes one at a time.
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use log::{debug, error};
use quote_common::Result;
use serde_json::Value;

use crate::api::UpstreamApi;
use crate::controller::{Effect, FetchKind, Ticket};

/// Result of one fetch, tagged with the ticket it was issued under.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Ticket of the originating effect.
    pub ticket: Ticket,
    /// Raw JSON body or the transport error.
    pub result: Result<Value>,
}

/// Helper type for running fetches against the upstream.
pub struct FetchDispatcher {
    api: Arc<dyn UpstreamApi>,
    tx: Sender<FetchOutcome>,
    suggest_timeout: Duration,
}

impl FetchDispatcher {
    /// Create a dispatcher posting outcomes to `tx`.
    ///
    /// Suggestion lookups use `suggest_timeout` as their transport timeout.
    pub fn new(api: Arc<dyn UpstreamApi>, tx: Sender<FetchOutcome>, suggest_timeout: Duration) -> Self {
        Self {
            api,
            tx,
            suggest_timeout,
        }
    }

    /// Start `effect` on a worker thread.
    pub fn dispatch(&self, effect: Effect) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let timeout = match effect.ticket.kind {
            FetchKind::Suggestion => Some(self.suggest_timeout),
            FetchKind::Quote => None,
        };

        thread::spawn(move || {
            let Effect { ticket, request } = effect;
            let result = api.get_json(&request, timeout);
            debug!("{:?} fetch #{} finished, ok={}", ticket.kind, ticket.seq, result.is_ok());
            if let Err(e) = tx.send(FetchOutcome { ticket, result }) {
                error!("Event loop gone, dropping fetch outcome: {}", e);
            }
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::controller::{ControllerConfig, QueryController};
    use crossbeam_channel::unbounded;
    use quote_common::request::ApiFunction;
    use quote_common::{QuoteError, UpstreamRequest};
    use serde_json::json;
    use std::sync::Mutex;

    /// Upstream fake answering from fixed bodies and recording every request.
    pub(crate) struct ScriptedApi {
        pub(crate) quotes: Value,
        pub(crate) matches: Value,
        pub(crate) calls: Mutex<Vec<UpstreamRequest>>,
    }

    impl ScriptedApi {
        pub(crate) fn new(quotes: Value, matches: Value) -> Self {
            Self {
                quotes,
                matches,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl UpstreamApi for ScriptedApi {
        fn get_json(&self, request: &UpstreamRequest, _timeout: Option<Duration>) -> Result<Value> {
            self.calls.lock().unwrap().push(request.clone());
            match request.function {
                ApiFunction::SymbolSearch => Ok(self.matches.clone()),
                ApiFunction::TimeSeriesIntraday | ApiFunction::BatchStockQuotes => {
                    if self.quotes.is_null() {
                        Err(QuoteError::Network("connection refused".into()))
                    } else {
                        Ok(self.quotes.clone())
                    }
                }
            }
        }
    }

    #[test]
    fn outcome_returns_with_its_ticket() {
        let api = Arc::new(ScriptedApi::new(json!({}), json!({ "bestMatches": [] })));
        let (tx, rx) = unbounded();
        let dispatcher = FetchDispatcher::new(api.clone(), tx, Duration::from_secs(1));

        let mut controller = QueryController::new("AAPL", ControllerConfig::default());
        let effect = controller.set_input("app").unwrap();
        let ticket = effect.ticket;
        dispatcher.dispatch(effect);

        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.ticket, ticket);
        assert!(outcome.result.is_ok());
        assert_eq!(api.calls.lock().unwrap()[0].keywords, "app");
    }

    #[test]
    fn transport_errors_are_forwarded() {
        let api = Arc::new(ScriptedApi::new(Value::Null, json!({})));
        let (tx, rx) = unbounded();
        let dispatcher = FetchDispatcher::new(api, tx, Duration::from_secs(1));

        let mut controller = QueryController::new("AAPL", ControllerConfig::default());
        dispatcher.dispatch(controller.fetch_quote("AAPL").unwrap());

        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(outcome.result, Err(QuoteError::Network(_))));
    }
}
