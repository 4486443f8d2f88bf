//! Upstream HTTP access.
//!
//! `UpstreamApi` is the seam between the controller's fetches and the network:
//! one GET in, one JSON body out. `HttpApi` implements it over a blocking
//! `reqwest` client; tests substitute scripted fakes.
use std::time::Duration;

use log::debug;
use quote_common::{QuoteError, Result, UpstreamRequest};
use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;

/// Something able to answer an `UpstreamRequest` with a JSON body.
pub trait UpstreamApi: Send + Sync {
    /// Perform the request. `timeout` overrides the transport default when set.
    fn get_json(&self, request: &UpstreamRequest, timeout: Option<Duration>) -> Result<Value>;
}

/// Alpha Vantage-style API reached over HTTPS GET.
pub struct HttpApi {
    client: Client,
    base: Url,
    api_key: String,
}

impl HttpApi {
    /// Build a client for `base_url` with a default per-request timeout.
    pub fn new(base_url: &str, api_key: &str, request_timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| QuoteError::InvalidInput(format!("bad base URL {:?}: {}", base_url, e)))?;
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| QuoteError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base,
            api_key: api_key.to_string(),
        })
    }

    /// Full URL for `request`, API key included.
    pub fn request_url(&self, request: &UpstreamRequest) -> Url {
        let mut url = self.base.clone();
        {
            let mut qp = url.query_pairs_mut();
            for (name, value) in request.query_pairs(&self.api_key) {
                qp.append_pair(name, &value);
            }
        }
        url
    }
}

impl UpstreamApi for HttpApi {
    fn get_json(&self, request: &UpstreamRequest, timeout: Option<Duration>) -> Result<Value> {
        debug!("GET {} {:?}{:?}", request.function, request.symbols, request.keywords);
        let mut builder = self
            .client
            .get(self.request_url(request))
            .header("accept", "application/json");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let resp = builder
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| QuoteError::Network(e.to_string()))?;
        let body = resp
            .bytes()
            .map_err(|e| QuoteError::Network(format!("read body failed: {}", e)))?;

        serde_json::from_slice(&body)
            .map_err(|e| QuoteError::UpstreamShape(format!("body is not JSON: {}", e)))
    }
}
